#![allow(clippy::needless_for_each)]

use std::path::PathBuf;

use anyhow::Result;
use serde_json::to_string_pretty;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::{ServerBuilder, ServerVariableBuilder};

use crate::handlers;

pub struct ServerAddon;

impl Modify for ServerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let version_variable = ServerVariableBuilder::new()
            .default_value("v1")
            .enum_values(Some(vec!["v1"]))
            .build();
        openapi.servers = Some(vec![
            ServerBuilder::new()
                .url("http://localhost:8080/{version}")
                .parameter("version", version_variable)
                .build(),
        ]);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::profile::create_profile,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::setup::get_setup,
        handlers::setup::register_setup,
        handlers::goals::calculate_goals,
        handlers::goals::get_active_goals,
        handlers::goals::get_cycle_goals,
        handlers::cycle::get_cycle_state,
        handlers::cycle::advance_cycle,
        handlers::operations::preview_operation,
        handlers::operations::record_operation,
        handlers::operations::list_cycle_operations,
        handlers::statistics::list_statistics,
        handlers::statistics::recompute_statistics,
        handlers::dashboard::get_dashboard,
        handlers::journal::reset_journal,
    ),
    modifiers(&ServerAddon),
    tags(
        (name = "Profile", description = "Trader profile"),
        (name = "Setup", description = "Market mode and the two cash boxes"),
        (name = "Goals", description = "30-day compound goal ladder"),
        (name = "Cycle", description = "Cycle grid and advancement"),
        (name = "Operations", description = "Daily profit and loss recording"),
        (name = "Statistics", description = "Per-cycle aggregates"),
        (name = "Dashboard", description = "Totals across cycles"),
        (name = "Journal", description = "Journal reset")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn generate_openapi_json(output_path: PathBuf) -> Result<()> {
        let openapi = Self::openapi();
        let json = to_string_pretty(&openapi)?;

        let file_path = output_path.join("openapi.json");

        tracing::info!("Saving OpenAPI specs to {}...", file_path.display());

        std::fs::write(&file_path, json)?;
        tracing::info!("OpenAPI specs saved!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;
        for path in [
            "/v1/users",
            "/v1/users/{user_id}",
            "/v1/users/{user_id}/setup",
            "/v1/users/{user_id}/goals",
            "/v1/users/{user_id}/goals/{cycle}",
            "/v1/users/{user_id}/cycle",
            "/v1/users/{user_id}/cycle/advance",
            "/v1/users/{user_id}/operations/preview",
            "/v1/users/{user_id}/operations",
            "/v1/users/{user_id}/cycles/{cycle}/operations",
            "/v1/users/{user_id}/statistics",
            "/v1/users/{user_id}/statistics/recompute",
            "/v1/users/{user_id}/dashboard",
            "/v1/users/{user_id}/journal",
        ] {
            assert!(paths.contains_key(path), "{path} missing from OpenAPI");
        }
    }
}
