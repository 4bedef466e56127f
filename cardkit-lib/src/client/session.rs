//! Client session facade.

use serde_json::Value;
use tokio::sync::RwLock;

use super::{ApiResponse, ClientTransport, HttpTransport};
use crate::config::SessionConfig;
use crate::context::PaymentContext;
use crate::decode::decode_document;
use crate::encryption::PublicKeyResponse;
use crate::iin::{iin_prefix, IinDetailsRequest, IinDetailsResponse, IinStatus};
use crate::meta::ClientMetaInfo;
use crate::prepare::{PaymentRequestPreparer, PreparedPaymentRequest};
use crate::product::{BasicPaymentProduct, BasicPaymentProducts, PaymentProduct};
use crate::request::PaymentRequest;
use crate::{PaymentProductId, Result};

/// One client session with the payment platform.
///
/// The session's public key is fetched once and reused.
pub struct Session<T> {
    config: SessionConfig,
    meta: ClientMetaInfo,
    transport: T,
    public_key: RwLock<Option<PublicKeyResponse>>,
}

impl Session<HttpTransport> {
    /// Open a session over HTTP.
    pub fn connect(config: SessionConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: ClientTransport + Send + Sync> Session<T> {
    pub fn new(config: SessionConfig, transport: T) -> Self {
        let meta = config.client_meta_info();
        Self {
            config,
            meta,
            transport,
            public_key: RwLock::new(None),
        }
    }

    /// Replace the client meta info sent with prepared requests.
    pub fn with_client_meta_info(mut self, meta: ClientMetaInfo) -> Self {
        self.meta = meta;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Payment products available in `context`.
    #[tracing::instrument(skip_all, fields(country = %context.country_code))]
    pub async fn basic_payment_products(
        &self,
        context: &PaymentContext,
    ) -> Result<BasicPaymentProducts> {
        let body = self
            .get("products", "payment products", &self.query(context))
            .await?;
        let products: BasicPaymentProducts = decode_document(body, "payment product list")?;
        tracing::debug!(count = products.len(), "fetched payment products");
        Ok(products)
    }

    /// Full details of one payment product, including its fields.
    #[tracing::instrument(skip_all, fields(product = %id))]
    pub async fn payment_product(
        &self,
        id: PaymentProductId,
        context: &PaymentContext,
    ) -> Result<PaymentProduct> {
        let body = self
            .get(&format!("products/{id}"), "payment product", &self.query(context))
            .await?;
        decode_document(body, "payment product")
    }

    /// The platform's public key for this session.
    #[tracing::instrument(skip_all)]
    pub async fn public_key(&self) -> Result<PublicKeyResponse> {
        if let Some(key) = self.public_key.read().await.as_ref() {
            return Ok(key.clone());
        }

        let mut cached = self.public_key.write().await;
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }

        let body = self.get("crypto/publickey", "public key", &[]).await?;
        let key: PublicKeyResponse = decode_document(body, "public key")?;
        tracing::debug!(key_id = key.key_id(), "fetched public key");
        *cached = Some(key.clone());
        Ok(key)
    }

    /// Identify the payment product of a partially entered card number.
    ///
    /// Fewer than six digits yield [`IinStatus::NotEnoughDigits`] without a
    /// request; an unknown prefix yields [`IinStatus::Unknown`].
    #[tracing::instrument(skip_all)]
    pub async fn iin_details(
        &self,
        partial_card_number: &str,
        context: &PaymentContext,
    ) -> Result<IinDetailsResponse> {
        let Some(bin) = iin_prefix(partial_card_number) else {
            return Ok(IinDetailsResponse::with_status(IinStatus::NotEnoughDigits));
        };

        let body = serde_json::to_value(IinDetailsRequest {
            bin,
            payment_context: context,
        })?;
        let response = self.transport.post("services/getIINdetails", &body).await?;
        if response.status == 404 {
            return Ok(IinDetailsResponse::with_status(IinStatus::Unknown));
        }

        let body = response.into_result("IIN details")?;
        let details: IinDetailsResponse = decode_document(body, "IIN details")?;
        let details = details.resolve_status();
        tracing::debug!(status = ?details.status, product = ?details.payment_product_id, "IIN lookup");
        Ok(details)
    }

    /// Validate and encrypt `request` with the session's public key.
    #[tracing::instrument(skip_all, fields(product = %request.product().id()))]
    pub async fn prepare_payment_request(
        &self,
        request: &PaymentRequest,
    ) -> Result<PreparedPaymentRequest> {
        let key = self.public_key().await?;
        PaymentRequestPreparer::new(&self.config.client_session_id, self.meta.clone(), &key)?
            .prepare(request)
    }

    /// Absolute URL of a product's logo, when an asset URL is configured.
    pub fn logo_url(&self, product: &BasicPaymentProduct) -> Option<String> {
        let base = self.config.asset_url.as_deref()?;
        let logo = product.display_hints.logo.as_deref()?;
        Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            logo.trim_start_matches('/')
        ))
    }

    fn query(&self, context: &PaymentContext) -> Vec<(&'static str, String)> {
        let mut params = context.query_params();
        if context.locale.is_none() {
            if let Some(locale) = &self.config.locale {
                params.push(("locale", locale.clone()));
            }
        }
        params
    }

    async fn get(&self, path: &str, resource: &str, query: &[(&str, String)]) -> Result<Value> {
        let response: ApiResponse = self.transport.get(path, query).await?;
        response.into_result(resource)
    }
}
