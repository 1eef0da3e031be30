//! Generic HTTP repository over one API resource

use std::{marker::PhantomData, sync::Arc};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::{storage::LocalStorage, ClientResult, TOKEN_KEY};

/// CRUD calls against a resource collection URL such as `.../api/authors`
pub struct HttpRepository<T> {
    http: Client,
    storage: Arc<dyn LocalStorage>,
    _resource: PhantomData<fn() -> T>,
}

impl<T> HttpRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(http: Client, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            http,
            storage,
            _resource: PhantomData,
        }
    }

    /// Attach the stored bearer token, if any
    async fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        Ok(match self.storage.get_item(TOKEN_KEY).await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// POST `obj` to `url`; true when the server answers 201
    pub async fn create(&self, url: &str, obj: &T) -> ClientResult<bool> {
        let request = self.authorized(self.http.post(url).json(obj)).await?;
        let response = request.send().await?;
        Ok(response.status() == StatusCode::CREATED)
    }

    /// DELETE `url/id`; true when the server answers 204
    pub async fn delete(&self, url: &str, id: i32) -> ClientResult<bool> {
        let request = self
            .authorized(self.http.delete(format!("{}/{}", url, id)))
            .await?;
        let response = request.send().await?;
        Ok(response.status() == StatusCode::NO_CONTENT)
    }

    /// GET `url/id`; `None` unless the server answers 200
    pub async fn get(&self, url: &str, id: i32) -> ClientResult<Option<T>> {
        let request = self
            .authorized(self.http.get(format!("{}/{}", url, id)))
            .await?;
        let response = request.send().await?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// GET `url`; `None` unless the server answers 200
    pub async fn get_all(&self, url: &str) -> ClientResult<Option<Vec<T>>> {
        let request = self.authorized(self.http.get(url)).await?;
        let response = request.send().await?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// PUT `obj` to `url/id`; true when the server answers 204
    pub async fn update(&self, url: &str, obj: &T, id: i32) -> ClientResult<bool> {
        let request = self
            .authorized(self.http.put(format!("{}/{}", url, id)).json(obj))
            .await?;
        let response = request.send().await?;
        Ok(response.status() == StatusCode::NO_CONTENT)
    }
}
