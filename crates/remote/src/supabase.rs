use crate::{ProjectFields, ProjectId, ProjectRecord, RemoteError, RemoteStore};
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub bucket: String,
    pub password_rpc: String,
    pub password_param: String,
}

/// PostgREST table access plus storage bucket access for one project.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    cfg: Arc<SupabaseConfig>,
}

impl SupabaseStore {
    pub fn new(mut cfg: SupabaseConfig) -> Self {
        cfg.url = cfg.url.trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.cfg.url, self.cfg.table)
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/{}", self.cfg.url, self.cfg.password_rpc)
    }

    fn object_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.cfg.url, self.cfg.bucket, object_name
        )
    }

    fn bucket_url(&self) -> String {
        format!("{}/storage/v1/object/{}", self.cfg.url, self.cfg.bucket)
    }

    fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.cfg.url, self.cfg.bucket, object_name
        )
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.cfg.api_key)
            .bearer_auth(&self.cfg.api_key)
    }

    fn list_request(&self) -> RequestBuilder {
        self.authed(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("order", "id.desc")])
    }

    fn insert_request(&self, fields: &ProjectFields) -> RequestBuilder {
        self.authed(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&[fields])
    }

    fn update_request(&self, id: &ProjectId, fields: &ProjectFields) -> RequestBuilder {
        self.authed(self.client.patch(self.table_url()))
            .query(&id_filter(id))
            .header("Prefer", "return=representation")
            .json(fields)
    }

    fn delete_request(&self, id: &ProjectId) -> RequestBuilder {
        self.authed(self.client.delete(self.table_url()))
            .query(&id_filter(id))
    }

    fn password_request(&self, password: &str) -> RequestBuilder {
        let mut body = serde_json::Map::new();
        body.insert(
            self.cfg.password_param.clone(),
            serde_json::Value::String(password.to_string()),
        );
        self.authed(self.client.post(self.rpc_url())).json(&body)
    }

    fn upload_request(
        &self,
        object_name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> RequestBuilder {
        let builder = self
            .authed(self.client.post(self.object_url(object_name)))
            .header("x-upsert", "false")
            .body(bytes);
        match content_type {
            Some(ct) => builder.header(reqwest::header::CONTENT_TYPE, ct),
            None => builder,
        }
    }

    fn delete_blob_request(&self, object_name: &str) -> RequestBuilder {
        #[derive(Serialize)]
        struct RemoveObjects<'a> {
            prefixes: [&'a str; 1],
        }
        self.authed(self.client.delete(self.bucket_url()))
            .json(&RemoveObjects {
                prefixes: [object_name],
            })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn rows(&self, builder: RequestBuilder) -> Result<Vec<ProjectRecord>, RemoteError> {
        let resp = self.send(builder).await?;
        resp.json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

fn id_filter(id: &ProjectId) -> Vec<(&'static str, String)> {
    vec![("id", format!("eq.{id}"))]
}

#[async_trait::async_trait]
impl RemoteStore for SupabaseStore {
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, RemoteError> {
        debug!(table = %self.cfg.table, "listing projects");
        self.rows(self.list_request()).await
    }

    async fn insert_project(&self, fields: &ProjectFields) -> Result<ProjectRecord, RemoteError> {
        debug!(title = %fields.title, "inserting project");
        self.rows(self.insert_request(fields))
            .await?
            .into_iter()
            .next()
            .ok_or(RemoteError::EmptyResponse)
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        fields: &ProjectFields,
    ) -> Result<ProjectRecord, RemoteError> {
        debug!(%id, "updating project");
        self.rows(self.update_request(id, fields))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }

    async fn delete_project(&self, id: &ProjectId) -> Result<(), RemoteError> {
        debug!(%id, "deleting project");
        self.send(self.delete_request(id)).await?;
        Ok(())
    }

    async fn verify_admin_password(&self, password: &str) -> Result<bool, RemoteError> {
        let resp = self.send(self.password_request(password)).await?;
        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(is_true(&value))
    }

    async fn upload_blob(
        &self,
        object_name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), RemoteError> {
        if object_name.is_empty() {
            return Err(RemoteError::InvalidObjectName(object_name.to_string()));
        }
        debug!(object_name, size = bytes.len(), "uploading blob");
        self.send(self.upload_request(object_name, bytes, content_type))
            .await?;
        Ok(())
    }

    async fn resolve_public_url(&self, object_name: &str) -> Result<String, RemoteError> {
        if object_name.is_empty() {
            return Err(RemoteError::InvalidObjectName(object_name.to_string()));
        }
        Ok(self.public_url(object_name))
    }

    async fn delete_blob(&self, object_name: &str) -> Result<(), RemoteError> {
        debug!(object_name, "deleting blob");
        self.send(self.delete_blob_request(object_name)).await?;
        Ok(())
    }
}

/// Only a literal `true` (bare or as the single row) passes the password check.
fn is_true(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Array(items) => items.first().map(is_true).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseStore {
        SupabaseStore::new(SupabaseConfig {
            url: "https://demo.supabase.co/".to_string(),
            api_key: "anon".to_string(),
            table: "project".to_string(),
            bucket: "images".to_string(),
            password_rpc: "verify_admin_password".to_string(),
            password_param: "input_password".to_string(),
        })
    }

    #[test]
    fn urls_are_built_without_double_slashes() {
        let s = store();
        assert_eq!(s.table_url(), "https://demo.supabase.co/rest/v1/project");
        assert_eq!(
            s.rpc_url(),
            "https://demo.supabase.co/rest/v1/rpc/verify_admin_password"
        );
        assert_eq!(
            s.object_url("photo_1.png"),
            "https://demo.supabase.co/storage/v1/object/images/photo_1.png"
        );
        assert_eq!(
            s.public_url("photo_1.png"),
            "https://demo.supabase.co/storage/v1/object/public/images/photo_1.png"
        );
    }

    #[tokio::test]
    async fn public_url_rejects_empty_name() {
        let err = store().resolve_public_url("").await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidObjectName(_)));
    }

    #[test]
    fn only_true_passes_password_check() {
        assert!(is_true(&serde_json::json!(true)));
        assert!(is_true(&serde_json::json!([true])));
        assert!(!is_true(&serde_json::json!(false)));
        assert!(!is_true(&serde_json::json!(null)));
        assert!(!is_true(&serde_json::json!("true")));
        assert!(!is_true(&serde_json::json!(1)));
    }

    #[test]
    fn id_filter_uses_postgrest_eq() {
        assert_eq!(id_filter(&ProjectId::Number(7))[0].1, "eq.7");
        assert_eq!(id_filter(&ProjectId::Text("a-b".into()))[0].1, "eq.a-b");
    }

    fn json_body(req: &reqwest::Request) -> serde_json::Value {
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    fn header<'a>(req: &'a reqwest::Request, name: &str) -> &'a str {
        req.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn requests_carry_api_key_twice() {
        let req = store().list_request().build().unwrap();
        assert_eq!(header(&req, "apikey"), "anon");
        assert_eq!(header(&req, "authorization"), "Bearer anon");
        assert_eq!(req.url().query(), Some("select=*&order=id.desc"));
    }

    #[test]
    fn writes_ask_for_the_stored_row_back() {
        let fields = ProjectFields {
            title: "Demo".to_string(),
            tags: vec!["web".to_string()],
            img_url: Some("https://x.co/a.png".to_string()),
        };
        let insert = store().insert_request(&fields).build().unwrap();
        assert_eq!(insert.method(), reqwest::Method::POST);
        assert_eq!(header(&insert, "prefer"), "return=representation");
        assert_eq!(
            json_body(&insert),
            serde_json::json!([{"title":"Demo","tags":["web"],"img_url":"https://x.co/a.png"}])
        );

        let update = store()
            .update_request(&ProjectId::Number(4), &fields)
            .build()
            .unwrap();
        assert_eq!(update.method(), reqwest::Method::PATCH);
        assert_eq!(header(&update, "prefer"), "return=representation");
        assert_eq!(update.url().query(), Some("id=eq.4"));
    }

    #[test]
    fn update_without_image_leaves_it_out_of_the_body() {
        let fields = ProjectFields {
            title: "Demo".to_string(),
            tags: Vec::new(),
            img_url: None,
        };
        let req = store()
            .update_request(&ProjectId::Number(4), &fields)
            .build()
            .unwrap();
        assert_eq!(json_body(&req), serde_json::json!({"title":"Demo","tags":[]}));
    }

    #[test]
    fn password_check_posts_named_parameter() {
        let req = store().password_request("hunter2").build().unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://demo.supabase.co/rest/v1/rpc/verify_admin_password"
        );
        assert_eq!(
            json_body(&req),
            serde_json::json!({"input_password":"hunter2"})
        );
    }

    #[test]
    fn upload_refuses_overwrite_and_sets_content_type() {
        let req = store()
            .upload_request("a_1.png", Bytes::from_static(b"png"), Some("image/png"))
            .build()
            .unwrap();
        assert_eq!(header(&req, "x-upsert"), "false");
        assert_eq!(header(&req, "content-type"), "image/png");
        assert_eq!(req.body().and_then(|b| b.as_bytes()), Some(&b"png"[..]));
    }

    #[test]
    fn blob_delete_sends_prefix_list() {
        let req = store().delete_blob_request("a_1.png").build().unwrap();
        assert_eq!(req.method(), reqwest::Method::DELETE);
        assert_eq!(
            req.url().as_str(),
            "https://demo.supabase.co/storage/v1/object/images"
        );
        assert_eq!(json_body(&req), serde_json::json!({"prefixes":["a_1.png"]}));
    }

    #[test]
    fn rows_decode_with_null_tags() {
        let rows: Vec<ProjectRecord> = serde_json::from_str(
            r#"[{"id":3,"title":"Demo","tags":null,"img_url":null},
                {"id":"x1","title":"Other","tags":["web"]}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].id, ProjectId::Number(3));
        assert!(rows[0].tags.is_empty());
        assert_eq!(rows[1].id, ProjectId::Text("x1".into()));
        assert_eq!(rows[1].tags, vec!["web".to_string()]);
        assert_eq!(rows[1].img_url, None);
    }
}
