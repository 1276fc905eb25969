use serde_json::Value;
use valux_core::{Error, Result, ServiceHealth};
use valux_service::types::{Page, Vault, VaultPerformance, VaultReceipt};
use valux_service::vault::{VaultProvider, VaultQuery};

use super::dto::VaultDto;
use super::{found, transform};
use crate::client::ApiClient;

impl ApiClient {
    async fn fetch_vault(&self, path: &str) -> Result<Option<Vault>> {
        let Some(value) = found(self.get::<Value>(path, &[]).await)? else {
            return Ok(None);
        };
        let dto: VaultDto = transform::decode("vault", value)?;
        transform::vault(dto).map(Some)
    }
}

#[async_trait::async_trait]
impl VaultProvider for ApiClient {
    async fn list_vaults(&self, query: &VaultQuery) -> Result<Page<Vault>> {
        let params = query.to_params();
        let value: Value = self.get("vaults", &params).await?;
        transform::vault_page(value)
    }

    async fn vault_by_id(&self, id: &str) -> Result<Option<Vault>> {
        self.fetch_vault(&format!("vaults/{id}")).await
    }

    async fn vault_by_address(&self, address: &str) -> Result<Option<Vault>> {
        self.fetch_vault(&format!("vaults/address/{address}")).await
    }

    async fn vault_performance(&self, id: &str) -> Result<VaultPerformance> {
        let value: Value = self.get(&format!("vaults/{id}/performance"), &[]).await?;
        transform::decode("vault performance", value)
    }

    async fn deposit(&self, _vault_id: &str, _amount: &str, _user: &str) -> Result<VaultReceipt> {
        Err(Error::unsupported().with_message("Deposits are signed on-chain by the wallet"))
    }

    async fn withdraw(&self, _vault_id: &str, _amount: &str, _user: &str) -> Result<VaultReceipt> {
        Err(Error::unsupported().with_message("Withdrawals are signed on-chain by the wallet"))
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(self.health().await)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use valux_core::ErrorKind;
    use valux_service::types::RiskLevel;
    use valux_service::vault::{SortField, SortOrder};

    use super::*;
    use crate::rest::tests::client_for;

    fn vault_dto(id: &str) -> Value {
        json!({
            "id": id,
            "name": "ETH Staking",
            "protocol": "Lido",
            "tokenSymbol": "ETH",
            "apy": 5.5,
            "riskLevel": "medium",
            "category": "yield",
            "tvl": "$8.1M",
            "insuranceAvailable": false,
            "autoCompounding": true,
            "withdrawalTerms": null
        })
    }

    #[tokio::test]
    async fn test_list_vaults_sends_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/vaults")
                    .query_param("riskLevel", "medium")
                    .query_param("sortBy", "apy")
                    .query_param("sortOrder", "desc");
                then.status(200).json_body(json!({
                    "success": true,
                    "data": {
                        "vaults": [vault_dto("v1"), vault_dto("v2")],
                        "total": 2, "page": 1, "limit": 20, "totalPages": 1
                    },
                    "timestamp": "t"
                }));
            })
            .await;

        let query = VaultQuery::new()
            .with_risk_level(RiskLevel::Medium)
            .with_sort(SortField::Apy, SortOrder::Desc);
        let page = client_for(&server).list_vaults(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].risk, RiskLevel::Medium);
        assert_eq!(page.items[0].features, vec!["Auto-Compounding", "Lido Protocol", "ETH Asset"]);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_list_vaults_rejects_missing_array() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/vaults");
                then.status(200).json_body(json!({"success": true, "data": {"total": 0}}));
            })
            .await;

        let error = client_for(&server)
            .list_vaults(&VaultQuery::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_vault_lookup_404_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/vaults/v1");
                then.status(200).json_body(vault_dto("v1"));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/vaults/address/0xmissing");
                then.status(404).json_body(json!({"message": "Vault not found"}));
            })
            .await;

        let client = client_for(&server);
        let vault = client.vault_by_id("v1").await.unwrap().unwrap();
        assert_eq!(vault.apy, "5.50%");
        assert!(client.vault_by_address("0xmissing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_vault_lookup_other_errors_propagate() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/vaults/v9");
                then.status(500);
            })
            .await;

        let error = client_for(&server).vault_by_id("v9").await.unwrap_err();
        assert!(error.is_api_error());
        assert_eq!(error.message(), "HTTP 500: Internal Server Error");
    }

    #[tokio::test]
    async fn test_deposit_is_unsupported() {
        let client = crate::ApiClient::new(crate::ApiConfig::default(), crate::TokenStore::in_memory())
            .unwrap();
        let error = client.deposit("v1", "10", "0xabc").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unsupported);
    }
}
