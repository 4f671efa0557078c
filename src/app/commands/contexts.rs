//! Cluster connections, the current context and profiles.

use serde_json::json;
use url::Url;

use crate::app::AppContext;
use crate::app::format::{FormattedTable, L};
use crate::domain::cluster::{ClusterDetails, decode_one};
use crate::domain::config::HTTP_CONNECTION;
use crate::domain::{AppError, ConnectionRecord, ProfileRecord};
use crate::ports::Query;

pub fn get_clusters(ctx: &AppContext) -> Result<String, AppError> {
    let config = ctx.store().config();
    let document = json!({ "clusters": config.clusters });
    ctx.output().render_value(&document, || {
        let mut table = FormattedTable::new()
            .with_alignment(&[L, L, L, L, L, L, L])
            .with_header(&["CONNECTION", "TYPE", "URL", "VERSION", "CLUSTER NAME", "TYPE", "CTX"]);
        for cluster in &config.clusters {
            let current = if cluster.name == config.current_context { "*" } else { "" };
            table.add_row(vec![
                cluster.name.clone(),
                cluster.connection_type.clone(),
                cluster.connection_url.clone(),
                cluster.cluster_version.clone(),
                cluster.cluster_name.clone(),
                cluster.cluster_type.clone(),
                current.to_string(),
            ])?;
        }
        Ok(table.render())
    })
}

fn validate_url(url: &str) -> Result<(), AppError> {
    let parsed =
        Url::parse(url).map_err(|e| AppError::invalid(format!("invalid URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::invalid(format!("URL scheme must be http or https, not '{other}'"))),
    }
}

/// Add a connection after contacting the cluster to record its name and version.
pub fn add_cluster(
    ctx: &mut AppContext,
    name: &str,
    url: &str,
    kind: &str,
) -> Result<String, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::invalid("connection name must not be empty"));
    }
    if kind != HTTP_CONNECTION {
        return Err(AppError::UnsupportedConnectionKind(kind.to_string()));
    }
    validate_url(url)?;
    if ctx.store().config().find_cluster(name).is_some() {
        return Err(AppError::DuplicateName { kind: "cluster connection", name: name.to_string() });
    }

    let mut record = ConnectionRecord::http(name, url);
    let details: ClusterDetails = {
        let fetcher = ctx.fetcher_for(&record)?;
        decode_one(&fetcher.query(&Query::ClusterDetails)?, "cluster details")?
    };
    record.cluster_name = details.cluster_name;
    record.cluster_version = details.version;
    tracing::info!(connection = name, cluster = %record.cluster_name, "adding connection");
    ctx.store_mut().add_cluster(record)?;
    Ok(format!("Added cluster {name} with type {kind} and URL {url}\n"))
}

pub fn remove_cluster(ctx: &mut AppContext, name: &str, yes: bool) -> Result<String, AppError> {
    if ctx.store().config().find_cluster(name).is_none() {
        return Err(AppError::not_found(format!("unable to find cluster connection '{name}'")));
    }
    ctx.confirm(yes, &format!("Are you sure you want to remove the connection to cluster {name}?"))?;
    ctx.store_mut().remove_cluster(name)?;
    Ok(format!("Removed connection for cluster {name}\n"))
}

pub fn set_context(ctx: &mut AppContext, name: &str) -> Result<String, AppError> {
    ctx.store_mut().set_current_context(name)?;
    Ok(format!("Current context is now {name}\n"))
}

pub fn get_context(ctx: &AppContext) -> String {
    match ctx.store().config().current_context.as_str() {
        "" => "No current context is set\n".to_string(),
        name => format!("Current context: {name}\n"),
    }
}

pub fn clear_context(ctx: &mut AppContext) -> Result<String, AppError> {
    ctx.store_mut().clear_current_context()?;
    Ok("Current context was cleared\n".to_string())
}

pub fn set_profile(ctx: &mut AppContext, name: &str, value: &str) -> Result<String, AppError> {
    let profile = ProfileRecord { name: name.to_string(), value: value.to_string() };
    ctx.store_mut().add_profile(profile)?;
    Ok(format!("Profile {name} added\n"))
}

pub fn get_profiles(ctx: &AppContext) -> Result<String, AppError> {
    let profiles = &ctx.store().config().profiles;
    ctx.output().render_value(&json!({ "profiles": profiles }), || {
        let mut table =
            FormattedTable::new().with_alignment(&[L, L]).with_header(&["PROFILE", "VALUE"]);
        for profile in profiles {
            table.add_row(vec![profile.name.clone(), profile.value.clone()])?;
        }
        Ok(table.render())
    })
}

pub fn remove_profile(ctx: &mut AppContext, name: &str, yes: bool) -> Result<String, AppError> {
    if ctx.store().config().find_profile(name).is_none() {
        return Err(AppError::not_found(format!("unable to find profile '{name}'")));
    }
    ctx.confirm(yes, &format!("Are you sure you want to remove the profile {name}?"))?;
    ctx.store_mut().remove_profile(name)?;
    Ok(format!("Profile {name} removed\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::GlobalOptions;
    use crate::app::output::OutputFormat;
    use crate::testing::{
        FakeFetcher, FakeNameService, TEST_CONNECTION, test_context, test_context_with,
    };

    fn fetcher() -> FakeFetcher {
        FakeFetcher::new().with_response(
            Query::ClusterDetails,
            r#"{"clusterName":"cluster1","version":"22.06.7","clusterSize":3}"#,
        )
    }

    #[test]
    fn add_records_cluster_metadata() {
        let (_dir, mut ctx) = test_context(&fetcher());
        let url = "http://host:30000/management/coherence/cluster";
        let out = add_cluster(&mut ctx, "c1", url, "http").unwrap();
        assert!(out.starts_with("Added cluster c1"));
        let record = ctx.store().config().find_cluster("c1").unwrap();
        assert_eq!(record.cluster_name, "cluster1");
        assert_eq!(record.cluster_version, "22.06.7");
        assert_eq!(record.discovery_type, "manual");
    }

    #[test]
    fn add_validates_before_contacting() {
        let fetcher = fetcher();
        let (_dir, mut ctx) = test_context(&fetcher);
        assert!(matches!(
            add_cluster(&mut ctx, "c1", "http://h:1", "grpc"),
            Err(AppError::UnsupportedConnectionKind(_))
        ));
        assert!(matches!(
            add_cluster(&mut ctx, "c1", "not a url", "http"),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            add_cluster(&mut ctx, TEST_CONNECTION, "http://h:1", "http"),
            Err(AppError::DuplicateName { .. })
        ));
        assert!(fetcher.recorded_queries().is_empty());
    }

    #[test]
    fn unreachable_cluster_is_not_added() {
        let (_dir, mut ctx) = test_context(&FakeFetcher::new());
        assert!(add_cluster(&mut ctx, "c1", "http://h:1", "http").is_err());
        assert!(ctx.store().config().find_cluster("c1").is_none());
    }

    #[test]
    fn removing_current_cluster_clears_context() {
        let (_dir, mut ctx) = test_context(&fetcher());
        let declined = remove_cluster(&mut ctx, TEST_CONNECTION, false);
        assert!(matches!(declined, Err(AppError::Cancelled)));
        remove_cluster(&mut ctx, TEST_CONNECTION, true).unwrap();
        assert_eq!(get_context(&ctx), "No current context is set\n");
        let again = remove_cluster(&mut ctx, TEST_CONNECTION, true);
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[test]
    fn context_round_trip() {
        let (_dir, mut ctx) = test_context(&fetcher());
        assert_eq!(get_context(&ctx), "Current context: test\n");
        clear_context(&mut ctx).unwrap();
        assert!(matches!(set_context(&mut ctx, "missing"), Err(AppError::NotFound(_))));
        set_context(&mut ctx, TEST_CONNECTION).unwrap();
        assert_eq!(get_context(&ctx), "Current context: test\n");
    }

    #[test]
    fn clusters_table_marks_current_context() {
        let (_dir, ctx) = test_context(&fetcher());
        let out = get_clusters(&ctx).unwrap();
        assert!(out.lines().nth(1).unwrap().trim_end().ends_with('*'));
    }

    #[test]
    fn clusters_json_lists_records() {
        let options = GlobalOptions { output: OutputFormat::Json, ..GlobalOptions::default() };
        let (_dir, ctx) = test_context_with(&fetcher(), FakeNameService::new(), options);
        let value: serde_json::Value = serde_json::from_str(&get_clusters(&ctx).unwrap()).unwrap();
        assert_eq!(value["clusters"][0]["name"], "test");
        assert_eq!(value["clusters"][0]["connectionType"], "http");
    }

    #[test]
    fn profiles_are_unique() {
        let (_dir, mut ctx) = test_context(&fetcher());
        set_profile(&mut ctx, "big", "-Xmx4g").unwrap();
        assert!(matches!(set_profile(&mut ctx, "big", "x"), Err(AppError::DuplicateName { .. })));
        assert!(get_profiles(&ctx).unwrap().contains("-Xmx4g"));
        remove_profile(&mut ctx, "big", true).unwrap();
        assert!(ctx.store().config().profiles.is_empty());
    }
}
