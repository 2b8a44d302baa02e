use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::{
    error::DisplayErrorContext, primitives::Blob, types::AttributeValue as SdkAttributeValue,
    Client,
};
use std::collections::HashMap;

use crate::connectors::store_trait::StatementStore;
use crate::utils::{
    config::AwsConfig,
    error::{ConversionError, DynapartError, DynapartResult, StoreError},
    types::{AttributeValue, Item, StatementPage, StatementRequest, TablePage},
};

/// DynamoDB store backed by the AWS SDK client
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Resolve credentials and region through the default AWS chain and build a client
    pub async fn connect(config: &AwsConfig) -> DynapartResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        require_region(&sdk_config)?;

        tracing::debug!(
            region = ?sdk_config.region(),
            endpoint = ?config.endpoint_url,
            "DynamoDB client configured"
        );

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl StatementStore for DynamoDbStore {
    async fn execute_statement(&self, request: StatementRequest) -> DynapartResult<StatementPage> {
        let parameters = if request.parameters.is_empty() {
            None
        } else {
            Some(request.parameters.into_iter().map(to_sdk).collect())
        };

        let output = self
            .client
            .execute_statement()
            .statement(request.statement)
            .set_parameters(parameters)
            .consistent_read(request.consistent_read)
            .set_next_token(request.next_token)
            .send()
            .await
            .map_err(|e| StoreError::ExecuteStatement(DisplayErrorContext(&e).to_string()))?;

        let items = output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(item_from_sdk)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StatementPage::new(items, output.next_token))
    }

    async fn list_tables(&self, start_after: Option<String>) -> DynapartResult<TablePage> {
        let output = self
            .client
            .list_tables()
            .set_exclusive_start_table_name(start_after)
            .send()
            .await
            .map_err(|e| StoreError::ListTables(DisplayErrorContext(&e).to_string()))?;

        Ok(TablePage {
            table_names: output.table_names.unwrap_or_default(),
            last_evaluated_table_name: output.last_evaluated_table_name,
        })
    }
}

fn require_region(sdk_config: &SdkConfig) -> DynapartResult<()> {
    match sdk_config.region() {
        Some(_) => Ok(()),
        None => Err(DynapartError::Configuration(
            "no AWS region configured; set AWS_REGION or pass --region".to_string(),
        )),
    }
}

fn to_sdk(value: AttributeValue) -> SdkAttributeValue {
    match value {
        AttributeValue::S(s) => SdkAttributeValue::S(s),
        AttributeValue::N(n) => SdkAttributeValue::N(n),
        AttributeValue::B(bytes) => SdkAttributeValue::B(Blob::new(bytes)),
        AttributeValue::Bool(b) => SdkAttributeValue::Bool(b),
        AttributeValue::Null => SdkAttributeValue::Null(true),
        AttributeValue::L(values) => SdkAttributeValue::L(values.into_iter().map(to_sdk).collect()),
        AttributeValue::M(fields) => SdkAttributeValue::M(
            fields
                .into_iter()
                .map(|(key, value)| (key, to_sdk(value)))
                .collect(),
        ),
        AttributeValue::Ss(values) => SdkAttributeValue::Ss(values),
        AttributeValue::Ns(values) => SdkAttributeValue::Ns(values),
        AttributeValue::Bs(values) => {
            SdkAttributeValue::Bs(values.into_iter().map(Blob::new).collect())
        }
    }
}

fn from_sdk(value: SdkAttributeValue) -> Result<AttributeValue, ConversionError> {
    Ok(match value {
        SdkAttributeValue::S(s) => AttributeValue::S(s),
        SdkAttributeValue::N(n) => AttributeValue::N(n),
        SdkAttributeValue::B(blob) => AttributeValue::B(blob.into_inner()),
        SdkAttributeValue::Bool(b) => AttributeValue::Bool(b),
        SdkAttributeValue::Null(_) => AttributeValue::Null,
        SdkAttributeValue::L(values) => AttributeValue::L(
            values
                .into_iter()
                .map(from_sdk)
                .collect::<Result<_, _>>()?,
        ),
        SdkAttributeValue::M(fields) => AttributeValue::M(item_from_sdk(fields)?),
        SdkAttributeValue::Ss(values) => AttributeValue::Ss(values),
        SdkAttributeValue::Ns(values) => AttributeValue::Ns(values),
        SdkAttributeValue::Bs(values) => {
            AttributeValue::Bs(values.into_iter().map(Blob::into_inner).collect())
        }
        other => return Err(ConversionError::UnsupportedAttribute(format!("{:?}", other))),
    })
}

fn item_from_sdk(fields: HashMap<String, SdkAttributeValue>) -> Result<Item, ConversionError> {
    fields
        .into_iter()
        .map(|(key, value)| Ok((key, from_sdk(value)?)))
        .collect()
}
