//! Client for the expense HTTP API.

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::expense::{Expense, ExpenseId, ExpensePayload};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no session token")]
    MissingToken,
    #[error("request failed: {0}")]
    Transport(#[from] gloo_net::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait(?Send)]
pub trait ExpenseApi {
    async fn list(&self, token: &str) -> Result<Vec<Expense>, ApiError>;

    async fn create(&self, token: &str, payload: &ExpensePayload) -> Result<Expense, ApiError>;

    async fn update(
        &self,
        token: &str,
        id: &ExpenseId,
        payload: &ExpensePayload,
    ) -> Result<Expense, ApiError>;

    async fn delete(&self, token: &str, id: &ExpenseId) -> Result<(), ApiError>;
}

pub fn list_url(config: &ApiConfig) -> String {
    config.endpoint("/despesas/listar")
}

pub fn create_url(config: &ApiConfig) -> String {
    config.endpoint("/despesas/cadastrar")
}

pub fn update_url(config: &ApiConfig, id: &ExpenseId) -> String {
    config.endpoint(&format!("/despesas/alterar/{}", id))
}

pub fn delete_url(config: &ApiConfig, id: &ExpenseId) -> String {
    config.endpoint(&format!("/despesas/deletar/{}", id))
}

/// Decodes a response body, treating missing or mistyped fields as a failure.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn checked(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(ApiError::Status(response.status()))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = checked(response)?.text().await?;
    decode(&body)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpExpenseApi {
    config: ApiConfig,
}

impl HttpExpenseApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }
}

#[async_trait(?Send)]
impl ExpenseApi for HttpExpenseApi {
    async fn list(&self, token: &str) -> Result<Vec<Expense>, ApiError> {
        let response = Request::get(&list_url(&self.config))
            .header("Authorization", &bearer(token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        read_json(response).await
    }

    async fn create(&self, token: &str, payload: &ExpensePayload) -> Result<Expense, ApiError> {
        let response = Request::post(&create_url(&self.config))
            .header("Authorization", &bearer(token))
            .json(payload)?
            .send()
            .await?;

        read_json(response).await
    }

    async fn update(
        &self,
        token: &str,
        id: &ExpenseId,
        payload: &ExpensePayload,
    ) -> Result<Expense, ApiError> {
        let response = Request::put(&update_url(&self.config, id))
            .header("Authorization", &bearer(token))
            .json(payload)?
            .send()
            .await?;

        read_json(response).await
    }

    async fn delete(&self, token: &str, id: &ExpenseId) -> Result<(), ApiError> {
        let response = Request::delete(&delete_url(&self.config, id))
            .header("Authorization", &bearer(token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        checked(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::PaymentMethod;

    #[test]
    fn endpoints_follow_the_api_contract() {
        let config = ApiConfig::new("http://localhost:8080");
        let id = ExpenseId::from(42);

        assert_eq!(list_url(&config), "http://localhost:8080/despesas/listar");
        assert_eq!(create_url(&config), "http://localhost:8080/despesas/cadastrar");
        assert_eq!(
            update_url(&config, &id),
            "http://localhost:8080/despesas/alterar/42"
        );
        assert_eq!(
            delete_url(&config, &id),
            "http://localhost:8080/despesas/deletar/42"
        );
    }

    #[test]
    fn bearer_header_carries_token() {
        assert_eq!(bearer("abc.def"), "Bearer abc.def");
    }

    #[test]
    fn decodes_list_body() {
        let body = r#"[
            {"id":1,"descricao":"Almoço","formaPagamento":"PIX","valor":25.5,"data":"2024-01-15"},
            {"id":2,"descricao":"Uber","formaPagamento":"CARTAO","valor":18,"data":"2024-01-16"}
        ]"#;

        let list: Vec<Expense> = decode(body).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[1].payment_method, PaymentMethod::Cartao);
        assert_eq!(list[1].amount, 18.0);
    }

    #[test]
    fn body_with_unknown_payment_method_is_a_decode_error() {
        let body = r#"{"id":1,"descricao":"Almoço","formaPagamento":"BOLETO","valor":25.5,"data":"2024-01-15"}"#;

        assert!(matches!(decode::<Expense>(body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        assert!(matches!(
            decode::<Vec<Expense>>("<html>oops</html>"),
            Err(ApiError::Decode(_))
        ));
    }
}
