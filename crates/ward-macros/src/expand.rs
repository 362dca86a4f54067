// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Macro expansion proper (L3, spec.md §4.6): scans a template with
//! `token::scan`, resolves each `$…$` token against a `MacroContext`, and
//! splices the (optionally cleaned) value back in. Expansion output is
//! never re-scanned — this is the single pass the spec requires to avoid
//! quoting vulnerabilities.

use crate::clean::{clean, CleanOptions};
use crate::environment::{MacroContext, MacroLookup};
use crate::standard::StandardMacro;
use crate::token::{scan, Token};
use chrono::TimeZone;
use ward_core::{Host, HostState, HostStateType, Service, ServiceState};

/// Expands every `$…$` token in `template` against `ctx`, resolving
/// on-demand forms (`$HOSTSTATE:host$`, `$ISVALIDTIME:tp:t$`, …) through
/// `lookup`. Unknown tokens expand to the empty string.
pub fn expand<L: MacroLookup>(template: &str, ctx: &MacroContext<'_>, lookup: &L) -> String {
    let tokens = scan(template);
    let mut out = String::with_capacity(template.len());
    for tok in tokens {
        match tok {
            Token::Literal(lit) => out.push_str(lit),
            Token::Macro { name, args } => {
                let (value, opts) = resolve(name, &args, ctx, lookup);
                out.push_str(&clean(&value, opts));
            }
        }
    }
    out
}

fn resolve<L: MacroLookup>(
    name: &str,
    args: &[&str],
    ctx: &MacroContext<'_>,
    lookup: &L,
) -> (String, CleanOptions) {
    if let Some(rest) = name.strip_prefix("ARG") {
        if let Ok(n) = rest.parse::<usize>() {
            if (1..=32).contains(&n) {
                return (ctx.args.get(n).to_string(), CleanOptions::NONE);
            }
        }
    }
    if let Some(rest) = name.strip_prefix("USER") {
        if let Ok(n) = rest.parse::<usize>() {
            if (1..=256).contains(&n) {
                return (ctx.user_macros.get(n).to_string(), CleanOptions::NONE);
            }
        }
    }
    if let Some(rest) = name.strip_prefix("CONTACTADDRESS") {
        if let Ok(n) = rest.parse::<u8>() {
            if (1..=6).contains(&n) {
                let v = ctx.contact.map(|c| c.addresses.get(n).to_string()).unwrap_or_default();
                return (v, CleanOptions::NONE);
            }
        }
    }
    if let Some(var) = name.strip_prefix("_HOST") {
        let v = ctx
            .host
            .and_then(|h| h.custom_vars.get(var))
            .map(|cv| cv.value.clone())
            .unwrap_or_default();
        return (v, CleanOptions::strip());
    }
    if let Some(var) = name.strip_prefix("_SERVICE") {
        let v = ctx
            .service
            .and_then(|s| s.custom_vars.get(var))
            .map(|cv| cv.value.clone())
            .unwrap_or_default();
        return (v, CleanOptions::strip());
    }
    if let Some(var) = name.strip_prefix("_CONTACT") {
        let v = ctx
            .contact
            .and_then(|c| c.custom_vars.get(var))
            .map(|cv| cv.value.clone())
            .unwrap_or_default();
        return (v, CleanOptions::strip());
    }

    match name {
        "ISVALIDTIME" => {
            let (tp_name, t) = (args.first().copied().unwrap_or(""), args.get(1).and_then(|s| s.parse::<i64>().ok()));
            let Some(t) = t else { return (String::new(), CleanOptions::NONE) };
            let value = lookup
                .timeperiod(tp_name)
                .and_then(|tp| ward_time::is_valid_time(t, tp, ctx.tz, &RegistryBridge(lookup)).ok())
                .map(|v| if v { "1" } else { "0" }.to_string())
                .unwrap_or_default();
            return (value, CleanOptions::NONE);
        }
        "NEXTVALIDTIME" => {
            let (tp_name, t) = (args.first().copied().unwrap_or(""), args.get(1).and_then(|s| s.parse::<i64>().ok()));
            let Some(t) = t else { return (String::new(), CleanOptions::NONE) };
            let value = lookup
                .timeperiod(tp_name)
                .and_then(|tp| ward_time::next_valid_time(t, tp, ctx.tz, &RegistryBridge(lookup)).ok())
                .flatten()
                .map(|v| v.to_string())
                .unwrap_or_default();
            return (value, CleanOptions::NONE);
        }
        "LONGDATETIME" => return (format_datetime(ctx, "%a %b %d %H:%M:%S %Z %Y"), CleanOptions::NONE),
        "SHORTDATETIME" => return (format_datetime(ctx, "%m-%d-%Y %H:%M:%S"), CleanOptions::NONE),
        "DATE" => return (format_datetime(ctx, "%m-%d-%Y"), CleanOptions::NONE),
        "TIME" => return (format_datetime(ctx, "%H:%M:%S"), CleanOptions::NONE),
        "TIMET" => return (ctx.now.to_string(), CleanOptions::NONE),
        "MAINCONFIGFILE" => return (ctx.main_config_file.to_string(), CleanOptions::NONE),
        "LOGFILE" => return (ctx.log_file.to_string(), CleanOptions::NONE),
        "EVENTSTARTTIME" => return (ctx.now.to_string(), CleanOptions::NONE),
        "NOTIFICATIONTYPE" => return (ctx.notification.map(|n| n.type_str().to_string()).unwrap_or_default(), CleanOptions::NONE),
        "NOTIFICATIONNUMBER" | "HOSTNOTIFICATIONNUMBER" | "SERVICENOTIFICATIONNUMBER" => {
            return (ctx.notification.map(|n| n.number.to_string()).unwrap_or_default(), CleanOptions::NONE);
        }
        "NOTIFICATIONAUTHOR" | "HOSTACKAUTHOR" | "SERVICEACKAUTHOR" => {
            return (ctx.notification.map(|n| n.author.clone()).unwrap_or_default(), CleanOptions::strip());
        }
        "NOTIFICATIONCOMMENT" | "HOSTACKCOMMENT" | "SERVICEACKCOMMENT" => {
            return (ctx.notification.map(|n| n.comment.clone()).unwrap_or_default(), CleanOptions::strip());
        }
        "NOTIFICATIONISESCALATED" => {
            return (
                ctx.notification.map(|n| if n.is_escalated { "1" } else { "0" }.to_string()).unwrap_or_default(),
                CleanOptions::NONE,
            );
        }
        _ => {}
    }

    if let Some(std_macro) = StandardMacro::from_name(name) {
        return resolve_standard(std_macro, args, ctx, lookup);
    }

    (String::new(), CleanOptions::NONE)
}

fn format_datetime(ctx: &MacroContext<'_>, fmt: &str) -> String {
    ctx.tz
        .timestamp_opt(ctx.now, 0)
        .single()
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_default()
}

/// On-demand host/service macros (`$HOSTSTATE:host$`,
/// `$SERVICESTATE:host:svc$`) target an entity resolved via `lookup`
/// instead of `ctx.host`/`ctx.service`; same-context macros fall back to
/// the notifier already bound into `ctx`.
fn resolve_standard<L: MacroLookup>(
    m: StandardMacro,
    args: &[&str],
    ctx: &MacroContext<'_>,
    lookup: &L,
) -> (String, CleanOptions) {
    let on_demand_host = args.first().and_then(|n| lookup.host(n));
    let on_demand_service = if args.len() >= 2 {
        lookup.service(args[0], args[1])
    } else {
        None
    };

    let host = on_demand_host.or(ctx.host);
    let service = on_demand_service.or(ctx.service);

    if let Some(v) = resolve_host_macro(m, host) {
        return (v, CleanOptions::NONE);
    }
    if let Some(v) = resolve_service_macro(m, service) {
        return (v, CleanOptions::NONE);
    }
    if let Some(v) = resolve_contact_macro(m, ctx.contact) {
        return (v, CleanOptions::NONE);
    }
    if let Some(v) = resolve_group_macro(m, args, lookup) {
        return (v, CleanOptions::NONE);
    }
    if let Some(v) = resolve_status_macro(m, ctx) {
        return (v, CleanOptions::NONE);
    }

    (String::new(), CleanOptions::NONE)
}

fn host_state_str(s: HostState) -> &'static str {
    match s {
        HostState::Up => "UP",
        HostState::Down => "DOWN",
        HostState::Unreachable => "UNREACHABLE",
    }
}

fn service_state_str(s: ServiceState) -> &'static str {
    match s {
        ServiceState::Ok => "OK",
        ServiceState::Warning => "WARNING",
        ServiceState::Critical => "CRITICAL",
        ServiceState::Unknown => "UNKNOWN",
    }
}

fn state_type_str(t: HostStateType) -> &'static str {
    match t {
        HostStateType::Soft => "SOFT",
        HostStateType::Hard => "HARD",
    }
}

fn resolve_host_macro(m: StandardMacro, host: Option<&Host>) -> Option<String> {
    let h = host?;
    use StandardMacro::*;
    Some(match m {
        HostName => h.name.clone(),
        HostAlias => h.name.clone(),
        HostAddress => h.address.clone(),
        HostDisplayName => h.display_name.clone(),
        HostState => host_state_str(h.current_state).to_string(),
        HostStateId => (h.current_state as u8).to_string(),
        HostStateType => state_type_str(h.state_type).to_string(),
        HostAttempt => h.current_attempt.to_string(),
        MaxHostAttempts => h.max_attempts.to_string(),
        HostOutput => h.plugin_output.clone(),
        LongHostOutput => h.long_plugin_output.clone(),
        HostPerfdata => h.perfdata.clone(),
        HostLatency => "0.00".to_string(),
        HostExecutionTime => "0.00".to_string(),
        HostDowntime => h.scheduled_downtime_depth.to_string(),
        HostCheckCommand => h.check_command.raw.clone(),
        HostCheckType => "ACTIVE".to_string(),
        LastHostCheck => h.last_check.to_string(),
        LastHostStateChange => h.last_hard_state_change.to_string(),
        LastHostState => h.last_state.map(host_state_str).unwrap_or("").to_string(),
        LastHostStateId => h.last_state.map(|s| (s as u8).to_string()).unwrap_or_default(),
        HostPercentChange => format!("{:.2}", h.percent_state_change),
        HostProblemId => h.problem_id.map(|p| p.get().to_string()).unwrap_or_default(),
        LastHostProblemId => h.last_problem_id.map(|p| p.get().to_string()).unwrap_or_default(),
        HostGroupNames => String::new(),
        ServiceIsVolatile => String::new(),
        _ => return None,
    })
}

fn resolve_service_macro(m: StandardMacro, service: Option<&Service>) -> Option<String> {
    let s = service?;
    use StandardMacro::*;
    Some(match m {
        ServiceDesc => s.description.clone(),
        ServiceDisplayName => s.display_name.clone(),
        ServiceState => service_state_str(s.current_state).to_string(),
        ServiceStateId => (s.current_state as u8).to_string(),
        ServiceStateType => state_type_str(s.state_type).to_string(),
        ServiceAttempt => s.current_attempt.to_string(),
        MaxServiceAttempts => s.max_attempts.to_string(),
        ServiceOutput => s.plugin_output.clone(),
        LongServiceOutput => s.long_plugin_output.clone(),
        ServicePerfdata => s.perfdata.clone(),
        ServiceLatency => "0.00".to_string(),
        ServiceExecutionTime => "0.00".to_string(),
        ServiceDowntime => s.scheduled_downtime_depth.to_string(),
        ServiceCheckCommand => s.check_command.raw.clone(),
        ServiceCheckType => "ACTIVE".to_string(),
        LastServiceCheck => s.last_check.to_string(),
        LastServiceStateChange => s.last_hard_state_change.to_string(),
        LastServiceState => s.last_state.map(service_state_str).unwrap_or("").to_string(),
        LastServiceStateId => s.last_state.map(|v| (v as u8).to_string()).unwrap_or_default(),
        ServicePercentChange => format!("{:.2}", s.percent_state_change),
        ServiceProblemId => s.problem_id.map(|p| p.get().to_string()).unwrap_or_default(),
        LastServiceProblemId => s.last_problem_id.map(|p| p.get().to_string()).unwrap_or_default(),
        _ => return None,
    })
}

fn resolve_contact_macro(m: StandardMacro, contact: Option<&ward_core::Contact>) -> Option<String> {
    let c = contact?;
    use StandardMacro::*;
    Some(match m {
        ContactName => c.name.clone(),
        ContactAlias => c.alias.clone(),
        ContactEmail => c.email.clone(),
        ContactPager => c.pager.clone(),
        _ => return None,
    })
}

fn resolve_group_macro<L: MacroLookup>(m: StandardMacro, args: &[&str], lookup: &L) -> Option<String> {
    use StandardMacro::*;
    let name = args.first()?;
    Some(match m {
        HostGroupMembers => lookup.hostgroup_members(name)?.join(","),
        ServiceGroupMembers => lookup
            .servicegroup_members(name)?
            .into_iter()
            .map(|(h, s)| format!("{h},{s}"))
            .collect::<Vec<_>>()
            .join(","),
        ContactGroupMembers => lookup.contactgroup_members(name)?.join(","),
        _ => return None,
    })
}

fn resolve_status_macro(m: StandardMacro, ctx: &MacroContext<'_>) -> Option<String> {
    use StandardMacro::*;
    let s = ctx.status?;
    Some(match m {
        TotalHostsUp => s.hosts_up.to_string(),
        TotalHostsDown => s.hosts_down.to_string(),
        TotalHostsUnreachable => s.hosts_unreachable.to_string(),
        TotalServicesOk => s.services_ok.to_string(),
        TotalServicesWarning => s.services_warning.to_string(),
        TotalServicesCritical => s.services_critical.to_string(),
        TotalServicesUnknown => s.services_unknown.to_string(),
        _ => return None,
    })
}

/// Adapts a `MacroLookup` into the `ward_time::TimePeriodLookup` the
/// evaluator needs for `$ISVALIDTIME$`/`$NEXTVALIDTIME$`'s recursive
/// exclusion handling.
struct RegistryBridge<'a, L>(&'a L);

impl<L: MacroLookup> ward_time::TimePeriodLookup for RegistryBridge<'_, L> {
    fn resolve(&self, name: &str) -> Option<&ward_core::TimePeriod> {
        self.0.timeperiod(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::{CommandRef, CustomVar};

    struct EmptyLookup;
    impl MacroLookup for EmptyLookup {
        fn host(&self, _: &str) -> Option<&Host> {
            None
        }
        fn service(&self, _: &str, _: &str) -> Option<&Service> {
            None
        }
        fn contact(&self, _: &str) -> Option<&ward_core::Contact> {
            None
        }
        fn timeperiod(&self, _: &str) -> Option<&ward_core::TimePeriod> {
            None
        }
        fn hostgroup_members(&self, _: &str) -> Option<Vec<String>> {
            None
        }
        fn servicegroup_members(&self, _: &str) -> Option<Vec<(String, String)>> {
            None
        }
        fn contactgroup_members(&self, _: &str) -> Option<Vec<String>> {
            None
        }
    }

    fn args() -> crate::ArgMacros {
        crate::ArgMacros::from_raw("check_http!80!/health")
    }

    fn users() -> crate::UserMacros {
        let mut u = crate::UserMacros::default();
        u.set(1, "/usr/lib/nagios/plugins");
        u
    }

    #[test]
    fn expands_host_and_arg_macros() {
        let a = args();
        let u = users();
        let host = Host::new("web1", CommandRef::new("check_ping"));
        let ctx = MacroContext::new(&a, &u, 1000, chrono_tz::UTC).with_host(&host);
        let out = expand("$USER1$/check_http -p $ARG1$ -u $ARG2$ -H $HOSTNAME$", &ctx, &EmptyLookup);
        assert_eq!(out, "/usr/lib/nagios/plugins/check_http -p 80 -u /health -H web1");
    }

    #[test]
    fn unknown_macro_expands_to_empty() {
        let a = args();
        let u = users();
        let ctx = MacroContext::new(&a, &u, 1000, chrono_tz::UTC);
        assert_eq!(expand("x$NOTAREALMACRO$y", &ctx, &EmptyLookup), "xy");
    }

    #[test]
    fn custom_host_var_is_stripped_of_illegal_chars() {
        let a = args();
        let u = users();
        let mut host = Host::new("web1", CommandRef::new("check_ping"));
        host.custom_vars.insert("REGION", CustomVar::new("us`east", false));
        let ctx = MacroContext::new(&a, &u, 1000, chrono_tz::UTC).with_host(&host);
        assert_eq!(expand("$_HOSTREGION$", &ctx, &EmptyLookup), "useast");
    }

    #[test]
    fn timet_reflects_context_clock() {
        let a = args();
        let u = users();
        let ctx = MacroContext::new(&a, &u, 424242, chrono_tz::UTC);
        assert_eq!(expand("$TIMET$", &ctx, &EmptyLookup), "424242");
    }
}
