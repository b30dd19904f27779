use serde::{Deserialize, Serialize};

use pharmasafe_core::Identity;
use pharmasafe_infra::NewProduct;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(alias = "productId")]
    pub product_id: String,
    #[serde(alias = "productType")]
    pub product_type: String,
    #[serde(alias = "batchNumber")]
    pub batch_number: String,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(value: CreateProductRequest) -> Self {
        NewProduct {
            product_id: value.product_id,
            product_type: value.product_type,
            batch_number: value.batch_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppendStageRequest {
    #[serde(alias = "stage", alias = "stageName")]
    pub stage_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddWriterRequest {
    #[serde(alias = "address")]
    pub identity: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct WritersResponse {
    pub root_authority: Identity,
    pub writers: Vec<Identity>,
}

#[derive(Debug, Serialize)]
pub struct WriterChangeResponse {
    pub identity: Identity,
    pub is_writer: bool,
}
