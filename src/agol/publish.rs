// src/agol/publish.rs
//! One-time creation of the hosted feature services the routine update
//! writes into.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::error::{LoadError, LoadResult};
use super::features::layer_definition;
use super::{portal, ArcGisClient};
use crate::datasets::DatasetDescriptor;
use crate::spatial::projection::WEB_MERCATOR_LATEST_WKID;
use crate::spatial::SpatialTable;

const PUBLISHED_CAPABILITIES: &str = "Query,Extract";
const MAX_RECORD_COUNT: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedItem {
    pub item_id: String,
    pub service_url: String,
    pub rows: usize,
}

pub trait Publisher {
    /// Creates, shares and fills a new hosted service for `dataset`.
    fn publish(&mut self, dataset: &DatasetDescriptor, table: &SpatialTable) -> LoadResult<PublishedItem>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateServiceResponse {
    #[serde(default)]
    success: bool,
    item_id: String,
    #[serde(rename = "serviceurl")]
    service_url: String,
}

pub(crate) fn create_parameters(dataset: &DatasetDescriptor) -> Value {
    json!({
        "name": dataset.table_name,
        "serviceDescription": dataset.title,
        "hasStaticData": false,
        "maxRecordCount": MAX_RECORD_COUNT,
        "supportedQueryFormats": "JSON",
        "capabilities": "Query",
        "allowGeometryUpdates": true,
        "spatialReference": { "wkid": WEB_MERCATOR_LATEST_WKID },
    })
}

fn parse_created(body: Value) -> LoadResult<CreateServiceResponse> {
    let created: CreateServiceResponse =
        serde_json::from_value(body).map_err(|e| LoadError::UnexpectedShape(e.to_string()))?;
    if !created.success {
        return Err(LoadError::UnexpectedShape(format!(
            "createService did not succeed for item {}",
            created.item_id
        )));
    }
    Ok(created)
}

impl ArcGisClient {
    fn user_content_url(&self, path: &str) -> String {
        self.sharing_url(&format!("content/users/{}/{}", self.username(), path))
    }

    fn create_service(&mut self, dataset: &DatasetDescriptor) -> LoadResult<CreateServiceResponse> {
        let url = self.user_content_url("createService");
        let body = self.post(
            &url,
            &[
                ("createParameters", create_parameters(dataset).to_string()),
                ("outputType", "featureService".to_string()),
            ],
        )?;
        parse_created(body)
    }

    fn define_layer(&mut self, dataset: &DatasetDescriptor, service_url: &str) -> LoadResult<()> {
        let admin = portal::admin_url(service_url);
        let definition = layer_definition(dataset, WEB_MERCATOR_LATEST_WKID);
        self.post(
            &format!("{}/addToDefinition", admin),
            &[("addToDefinition", definition.to_string())],
        )?;
        self.post(
            &format!("{}/updateDefinition", admin),
            &[(
                "updateDefinition",
                json!({ "capabilities": PUBLISHED_CAPABILITIES }).to_string(),
            )],
        )?;
        Ok(())
    }

    fn share_publicly(&mut self, item_id: &str) -> LoadResult<()> {
        let url = self.user_content_url(&format!("items/{}/share", item_id));
        self.post(
            &url,
            &[("everyone", "true".to_string()), ("org", "true".to_string())],
        )?;
        Ok(())
    }

    fn set_title(&mut self, item_id: &str, title: &str) -> LoadResult<()> {
        let url = self.user_content_url(&format!("items/{}/update", item_id));
        let body = self.post(&url, &[("title", title.to_string())])?;
        if !portal::is_success(&body) {
            return Err(LoadError::UnexpectedShape(format!("item update did not succeed: {}", body)));
        }
        Ok(())
    }
}

impl Publisher for ArcGisClient {
    fn publish(&mut self, dataset: &DatasetDescriptor, table: &SpatialTable) -> LoadResult<PublishedItem> {
        info!("{}: creating hosted service {}", dataset.key, dataset.table_name);
        let created = self.create_service(dataset)?;

        self.define_layer(dataset, &created.service_url)?;
        self.share_publicly(&created.item_id)?;
        self.set_title(&created.item_id, dataset.title)?;

        let (service_url, layer_id) = self.layer_url(&created.item_id, &dataset.kind)?;
        let rows = self.load_into(&service_url, layer_id, table)?;

        info!("{}: published item {}", dataset.key, created.item_id);
        Ok(PublishedItem {
            item_id: created.item_id,
            service_url,
            rows,
        })
    }
}
