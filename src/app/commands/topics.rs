//! Topic verbs.

use crate::app::AppContext;
use crate::app::commands::{
    OPERATION_COMPLETED, fetch_services, merge_collections, require_service,
};
use crate::app::format::units::format_large_integer;
use crate::app::format::{FormattedTable, L, R};
use crate::domain::AppError;
use crate::domain::cluster::{PAGED_TOPIC_SERVICE, TOPICS_KEY, Topic};
use crate::ports::{Mutation, Query};

pub fn get_topics(ctx: &AppContext, service: Option<&str>) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let services = fetch_services(fetcher.as_ref(), Some(PAGED_TOPIC_SERVICE))?;
    let names: Vec<String> = match service {
        Some(name) => vec![require_service(&services, name)?.name.clone()],
        None => services.iter().map(|s| s.name.clone()).collect(),
    };
    let bodies = names
        .iter()
        .map(|name| fetcher.query(&Query::Topics { service: name.clone() }))
        .collect::<Result<Vec<_>, _>>()?;
    let document = merge_collections(&bodies, TOPICS_KEY)?;

    ctx.output().render_value(&document, || {
        let mut topics: Vec<Topic> = serde_json::from_value(document[TOPICS_KEY].clone())?;
        topics.sort_by(|a, b| (&a.service, &a.name).cmp(&(&b.service, &b.name)));
        let mut table = FormattedTable::new()
            .with_alignment(&[L, L, R, R, R, R])
            .with_header(&["SERVICE", "TOPIC", "CHANNELS", "PUBLISHED", "SUBSCRIBERS", "GROUPS"]);
        for t in topics {
            table.add_row(vec![
                t.service,
                t.name,
                t.channel_count.to_string(),
                format_large_integer(t.published_count),
                t.subscriber_count.to_string(),
                t.subscriber_group_count.to_string(),
            ])?;
        }
        Ok(table.render())
    })
}

/// Identifies one subscriber of a topic.
#[derive(Debug, Clone, Copy)]
pub struct SubscriberRef<'a> {
    pub service: &'a str,
    pub topic: &'a str,
    pub subscriber: i64,
}

/// Connect or disconnect a topic subscriber.
pub fn subscriber_operation(
    ctx: &AppContext,
    target: SubscriberRef<'_>,
    connect: bool,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let services = fetch_services(fetcher.as_ref(), Some(PAGED_TOPIC_SERVICE))?;
    require_service(&services, target.service)?;
    let verb = if connect { "connect" } else { "disconnect" };
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to {verb} subscriber {} for topic {} in service {}?",
            target.subscriber, target.topic, target.service
        ),
    )?;
    fetcher.mutate(&Mutation::Subscriber {
        service: target.service.to_string(),
        topic: target.topic.to_string(),
        subscriber: target.subscriber,
        connect,
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};

    fn fixture() -> FakeFetcher {
        FakeFetcher::new()
            .with_response(
                Query::Services,
                r#"{"services":[{"name":"Topics","type":"PagedTopic"},{"name":"Dist","type":"DistributedCache"}]}"#,
            )
            .with_response(
                Query::Topics { service: "Topics".into() },
                r#"{"topics":[{"name":"orders","service":"Topics","channelCount":17,"publishedCount":12000}]}"#,
            )
    }

    #[test]
    fn topics_only_from_paged_topic_services() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_topics(&ctx, None).unwrap();
        assert!(out.contains("orders"));
        assert!(out.contains("12,000"));
        assert!(!fetcher.recorded_queries().contains(&Query::Topics { service: "Dist".into() }));
    }

    #[test]
    fn disconnect_subscriber() {
        let fetcher = fixture();
        let (_dir, ctx) = test_context(&fetcher);
        let target = SubscriberRef { service: "Topics", topic: "orders", subscriber: 42 };
        subscriber_operation(&ctx, target, false, true).unwrap();
        assert_eq!(
            fetcher.recorded_mutations(),
            vec![Mutation::Subscriber {
                service: "Topics".into(),
                topic: "orders".into(),
                subscriber: 42,
                connect: false,
            }]
        );

        let wrong = SubscriberRef { service: "Dist", ..target };
        let err = subscriber_operation(&ctx, wrong, true, true).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
