//! Federation verbs.

use crate::app::AppContext;
use crate::app::commands::{fetch_services, merge_collections, require_service, status_text};
use crate::app::format::units::{format_bytes, format_large_integer};
use crate::app::format::{FormattedTable, L, R};
use crate::domain::AppError;
use crate::domain::cluster::{FEDERATED_SERVICE, FederationParticipant, PARTICIPANTS_KEY};
use crate::ports::{FederationOperation, Mutation, Query};

pub fn get_federation(ctx: &AppContext, service: Option<&str>) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let services = fetch_services(fetcher.as_ref(), Some(FEDERATED_SERVICE))?;
    let names: Vec<String> = match service {
        Some(name) => vec![require_service(&services, name)?.name.clone()],
        None => services.iter().map(|s| s.name.clone()).collect(),
    };
    let bodies = names
        .iter()
        .map(|name| fetcher.query(&Query::FederationParticipants { service: name.clone() }))
        .collect::<Result<Vec<_>, _>>()?;
    let document = merge_collections(&bodies, PARTICIPANTS_KEY)?;

    ctx.output().render_value(&document, || {
        let mut participants: Vec<FederationParticipant> =
            serde_json::from_value(document[PARTICIPANTS_KEY].clone())?;
        participants.sort_by(|a, b| {
            (&a.service_name, &a.participant_name).cmp(&(&b.service_name, &b.participant_name))
        });
        let unit = ctx.bytes_unit();
        let mut table = FormattedTable::new()
            .with_alignment(&[L, L, L, L, R, R, R])
            .with_header(&[
                "SERVICE",
                "PARTICIPANT",
                "STATE",
                "STATUS",
                "BYTES SENT",
                "MSGS SENT",
                "REPLICATE ALL",
            ]);
        for p in participants {
            table.add_row(vec![
                p.service_name,
                p.participant_name,
                p.state,
                p.status,
                format_bytes(p.total_bytes_sent, unit),
                format_large_integer(p.total_msg_sent),
                format!("{}%", p.replicate_all_percent_complete),
            ])?;
        }
        Ok(table.render())
    })
}

fn describe_operation(operation: FederationOperation) -> &'static str {
    match operation {
        FederationOperation::Start => "start",
        FederationOperation::Stop => "stop",
        FederationOperation::Pause => "pause",
        FederationOperation::ReplicateAll => "replicate all",
        FederationOperation::NotifyPopulated => "notify populated",
    }
}

/// Apply a federation operation to one participant, or all when none is given.
pub fn federation_operation(
    ctx: &AppContext,
    service: &str,
    participant: Option<&str>,
    operation: FederationOperation,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    require_service(&fetch_services(fetcher.as_ref(), Some(FEDERATED_SERVICE))?, service)?;
    let participant = participant.filter(|p| !p.is_empty() && *p != "all");
    let scope = match participant {
        Some(p) => format!("participant {p}"),
        None => "all participants".to_string(),
    };
    let verb = describe_operation(operation);
    ctx.confirm(
        yes,
        &format!("Are you sure you want to {verb} for {scope} of service {service}?"),
    )?;
    let body = fetcher.mutate(&Mutation::Federation {
        service: service.to_string(),
        participant: participant.map(String::from),
        operation,
    })?;
    Ok(status_text(&body, &format!("operation {verb} for {scope} of service {service} invoked")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};

    fn fixture() -> FakeFetcher {
        FakeFetcher::new()
            .with_response(
                Query::Services,
                r#"{"services":[{"name":"Fed","type":"FederatedCache"},{"name":"Dist","type":"DistributedCache"}]}"#,
            )
            .with_response(
                Query::FederationParticipants { service: "Fed".into() },
                r#"{"participants":[{"participantName":"london","serviceName":"Fed","state":"Idle","totalBytesSent":2048}]}"#,
            )
    }

    #[test]
    fn lists_participants() {
        let (_dir, ctx) = test_context(&fixture());
        let out = get_federation(&ctx, None).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with("Fed "));
        assert!(out.contains("london"));
    }

    #[test]
    fn all_participants_when_none_given() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        federation_operation(&ctx, "Fed", Some("all"), FederationOperation::Stop, true).unwrap();
        federation_operation(&ctx, "Fed", Some("london"), FederationOperation::Start, true).unwrap();
        assert_eq!(
            fetcher.recorded_mutations(),
            vec![
                Mutation::Federation {
                    service: "Fed".into(),
                    participant: None,
                    operation: FederationOperation::Stop
                },
                Mutation::Federation {
                    service: "Fed".into(),
                    participant: Some("london".into()),
                    operation: FederationOperation::Start
                },
            ]
        );
    }

    #[test]
    fn non_federated_service_is_rejected() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let err = federation_operation(&ctx, "Dist", None, FederationOperation::ReplicateAll, true)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(fetcher.recorded_mutations().is_empty());
    }
}
