//! Flight Recorder commands issued through the cluster's diagnostic endpoint.

use crate::app::AppContext;
use crate::app::commands::{member_ids, status_text};
use crate::domain::{AppError, NodeSelection};
use crate::ports::{JfrCommand, Mutation};

/// Where a recording command is sent: one member, a role, or every member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JfrScope<'a> {
    pub node_id: Option<i32>,
    pub role: Option<&'a str>,
}

impl JfrScope<'_> {
    fn validate(&self) -> Result<(), AppError> {
        if self.node_id.is_some() && self.role.is_some() {
            return Err(AppError::invalid("only one of node id or role may be specified"));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match (self.node_id, self.role) {
            (Some(id), _) => format!("member {id}"),
            (None, Some(role)) => format!("members with role {role}"),
            (None, None) => "all members".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JfrStart<'a> {
    pub name: &'a str,
    pub scope: JfrScope<'a>,
    pub duration_secs: i64,
    pub output_dir: Option<&'a str>,
}

/// Build the diagnostic-command option string for a recording start.
pub fn start_options(request: &JfrStart<'_>) -> Result<String, AppError> {
    if request.duration_secs < 0 {
        return Err(AppError::invalid("duration must be zero or greater"));
    }
    let mut options = format!("name={}", request.name);
    if request.duration_secs > 0 {
        options.push_str(&format!(",duration={}s", request.duration_secs));
    }
    if let Some(dir) = request.output_dir.filter(|d| !d.is_empty()) {
        let filename = match request.scope.node_id {
            Some(_) => format!("{}/{}.jfr", dir.trim_end_matches('/'), request.name),
            None => dir.to_string(),
        };
        options.push_str(&format!(",filename={filename}"));
    }
    Ok(options)
}

fn run_jfr(
    ctx: &AppContext,
    command: JfrCommand,
    scope: &JfrScope<'_>,
    options: String,
) -> Result<Vec<u8>, AppError> {
    let fetcher = ctx.fetcher()?;
    if let Some(node_id) = scope.node_id {
        NodeSelection::Ids(vec![node_id]).resolve(&member_ids(fetcher.as_ref())?)?;
    }
    fetcher.mutate(&Mutation::Jfr {
        command,
        node_id: scope.node_id,
        role: scope.role.map(String::from),
        options,
    })
}

pub fn start_jfr(ctx: &AppContext, request: &JfrStart<'_>, yes: bool) -> Result<String, AppError> {
    request.scope.validate()?;
    let options = start_options(request)?;
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to start a Flight Recording named {} for {}?",
            request.name,
            request.scope.describe()
        ),
    )?;
    let body = run_jfr(ctx, JfrCommand::Start, &request.scope, options)?;
    Ok(status_text(&body, &format!("started recording {}", request.name)))
}

pub fn stop_jfr(
    ctx: &AppContext,
    name: &str,
    scope: &JfrScope<'_>,
    yes: bool,
) -> Result<String, AppError> {
    scope.validate()?;
    ctx.confirm(
        yes,
        &format!("Are you sure you want to stop the Flight Recording {name} for {}?", scope.describe()),
    )?;
    let body = run_jfr(ctx, JfrCommand::Stop, scope, format!("name={name}"))?;
    Ok(status_text(&body, &format!("stopped recording {name}")))
}

pub fn dump_jfr(
    ctx: &AppContext,
    name: &str,
    scope: &JfrScope<'_>,
    filename: Option<&str>,
    yes: bool,
) -> Result<String, AppError> {
    scope.validate()?;
    let mut options = format!("name={name}");
    if let Some(file) = filename.filter(|f| !f.is_empty()) {
        options.push_str(&format!(",filename={file}"));
    }
    ctx.confirm(
        yes,
        &format!("Are you sure you want to dump the Flight Recording {name} for {}?", scope.describe()),
    )?;
    let body = run_jfr(ctx, JfrCommand::Dump, scope, options)?;
    Ok(status_text(&body, &format!("dumped recording {name}")))
}

/// List recordings. Read-only, so it is never confirm gated.
pub fn get_jfrs(ctx: &AppContext, scope: &JfrScope<'_>) -> Result<String, AppError> {
    scope.validate()?;
    let body = run_jfr(ctx, JfrCommand::Check, scope, String::new())?;
    ctx.output().render(&body, || Ok(status_text(&body, "no recordings found")))
}

pub fn describe_jfr(
    ctx: &AppContext,
    name: &str,
    scope: &JfrScope<'_>,
) -> Result<String, AppError> {
    scope.validate()?;
    let body = run_jfr(ctx, JfrCommand::Check, scope, format!("name={name}"))?;
    ctx.output().render(&body, || Ok(status_text(&body, &format!("no recording named {name}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, test_context};

    #[test]
    fn start_options_include_duration_and_file() {
        let request = JfrStart {
            name: "rec",
            scope: JfrScope { node_id: Some(1), role: None },
            duration_secs: 30,
            output_dir: Some("/tmp/jfr/"),
        };
        assert_eq!(
            start_options(&request).unwrap(),
            "name=rec,duration=30s,filename=/tmp/jfr/rec.jfr"
        );

        let cluster_wide = JfrStart { scope: JfrScope::default(), ..request.clone() };
        assert_eq!(
            start_options(&cluster_wide).unwrap(),
            "name=rec,duration=30s,filename=/tmp/jfr/"
        );

        let negative = JfrStart { duration_secs: -1, ..request };
        assert!(matches!(start_options(&negative), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn node_and_role_are_exclusive() {
        let fetcher = FakeFetcher::new().with_members(&[1]);
        let (_dir, ctx) = test_context(&fetcher);
        let scope = JfrScope { node_id: Some(1), role: Some("storage") };
        assert!(stop_jfr(&ctx, "rec", &scope, true).is_err());
        assert!(fetcher.recorded_mutations().is_empty());
    }

    #[test]
    fn start_on_member_posts_options() {
        let fetcher = FakeFetcher::new().with_members(&[1, 2]);
        let (_dir, ctx) = test_context(&fetcher);
        let request = JfrStart {
            name: "rec",
            scope: JfrScope { node_id: Some(2), role: None },
            ..Default::default()
        };
        assert_eq!(start_jfr(&ctx, &request, true).unwrap(), "ok\n");
        assert_eq!(
            fetcher.recorded_mutations(),
            vec![Mutation::Jfr {
                command: JfrCommand::Start,
                node_id: Some(2),
                role: None,
                options: "name=rec".into(),
            }]
        );

        let missing = JfrStart { scope: JfrScope { node_id: Some(9), role: None }, ..request };
        assert!(start_jfr(&ctx, &missing, true).is_err());
    }

    #[test]
    fn check_is_not_confirm_gated() {
        let fetcher = FakeFetcher::new();
        let (_dir, ctx) = test_context(&fetcher);
        let out = get_jfrs(&ctx, &JfrScope { node_id: None, role: Some("storage") }).unwrap();
        assert_eq!(out, "ok\n");
        assert!(matches!(
            &fetcher.recorded_mutations()[0],
            Mutation::Jfr { command: JfrCommand::Check, role: Some(r), .. } if r == "storage"
        ));
    }
}
