// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The entity registry (L4, spec.md §3): owns every long-lived object —
//! hosts, services, contacts, groups, commands, connectors, timeperiods,
//! dependencies, escalations, downtimes, comments — and offers lookup by
//! name or id. Per spec.md §5, the registry is single-writer (the main
//! event loop) and multi-reader; `SharedRegistry` wraps it the way the
//! teacher wraps its materialized state, in an `Arc<RwLock<_>>`.

use crate::error::RegistryError;
use indexmap::IndexMap;
use std::sync::Arc;
use ward_core::{
    Command, CommandId, Comment, CommentId, CommentSource, Connector, ConnectorId, Contact,
    ContactGroup, ContactGroupId, ContactId, Dependency, Downtime, DowntimeId, Escalation,
    EntryType, Host, HostGroup, HostGroupId, HostId, ProblemId, SequentialIdGen, Service,
    ServiceGroup, ServiceGroupId, ServiceId, TimePeriod,
};

/// Convenience alias matching the teacher's `Arc<parking_lot::Mutex<_>>`
/// pattern for shared mutable state handed to worker tasks.
pub type SharedRegistry = Arc<parking_lot::RwLock<Registry>>;

/// Owns every configured and runtime entity. Cross-references (host
/// parent/child, dependency master/dependent, escalation contacts) are
/// non-owning lookups by stable name, per spec.md §9's design note
/// replacing raw-pointer back-references with id-indexed adjacency.
#[derive(Debug, Default)]
pub struct Registry {
    hosts: IndexMap<String, Host>,
    services: IndexMap<(String, String), Service>,
    contacts: IndexMap<String, Contact>,
    contact_groups: IndexMap<String, ContactGroup>,
    host_groups: IndexMap<String, HostGroup>,
    service_groups: IndexMap<String, ServiceGroup>,
    commands: IndexMap<String, Command>,
    connectors: IndexMap<String, Connector>,
    timeperiods: IndexMap<String, TimePeriod>,
    dependencies: Vec<Dependency>,
    escalations: Vec<Escalation>,
    downtimes: IndexMap<u64, Downtime>,
    comments: IndexMap<u64, Comment>,
    problem_ids: SequentialIdGen,
    downtime_ids: SequentialIdGen,
    comment_ids: SequentialIdGen,
}

impl Registry {
    pub fn new() -> Self {
        let mut reg = Self {
            problem_ids: SequentialIdGen::new("problem"),
            downtime_ids: SequentialIdGen::new("downtime"),
            comment_ids: SequentialIdGen::new("comment"),
            ..Default::default()
        };
        reg.timeperiods.insert("24x7".to_string(), TimePeriod::always());
        reg
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(parking_lot::RwLock::new(self))
    }

    // -- hosts --------------------------------------------------------

    pub fn insert_host(&mut self, host: Host) -> Result<(), RegistryError> {
        if self.hosts.contains_key(&host.name) {
            return Err(RegistryError::DuplicateHost(host.name));
        }
        self.hosts.insert(host.name.clone(), host);
        Ok(())
    }

    pub fn host(&self, name: &str) -> Option<&Host> {
        self.hosts.get(name)
    }

    pub fn host_mut(&mut self, name: &str) -> Option<&mut Host> {
        self.hosts.get_mut(name)
    }

    pub fn require_host(&self, name: &str) -> Result<&Host, RegistryError> {
        self.host(name).ok_or_else(|| RegistryError::HostNotFound(name.to_string()))
    }

    pub fn require_host_mut(&mut self, name: &str) -> Result<&mut Host, RegistryError> {
        self.host_mut(name).ok_or_else(|| RegistryError::HostNotFound(name.to_string()))
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.values()
    }

    /// Removes a host and every service on it. Per spec.md §4.2 `forget`,
    /// reload-time deletion must never leave a dangling reference; callers
    /// (the reaper, the router) are responsible for forgetting any
    /// in-flight command ids that targeted this host first.
    pub fn remove_host(&mut self, name: &str) -> Option<Host> {
        self.services.retain(|(host_name, _), _| host_name != name);
        self.hosts.shift_remove(name)
    }

    // -- services -------------------------------------------------------

    pub fn insert_service(&mut self, service: Service) -> Result<(), RegistryError> {
        let key = (self.host_name_of(&service.host_id), service.description.clone());
        if self.services.contains_key(&key) {
            return Err(RegistryError::DuplicateService {
                host: key.0,
                description: key.1,
            });
        }
        self.services.insert(key, service);
        Ok(())
    }

    fn host_name_of(&self, host_id: &HostId) -> String {
        host_id.as_str().to_string()
    }

    pub fn service(&self, host_name: &str, description: &str) -> Option<&Service> {
        self.services.get(&(host_name.to_string(), description.to_string()))
    }

    pub fn service_mut(&mut self, host_name: &str, description: &str) -> Option<&mut Service> {
        self.services.get_mut(&(host_name.to_string(), description.to_string()))
    }

    pub fn require_service(&self, host_name: &str, description: &str) -> Result<&Service, RegistryError> {
        self.service(host_name, description).ok_or_else(|| RegistryError::ServiceNotFound {
            host: host_name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn require_service_mut(&mut self, host_name: &str, description: &str) -> Result<&mut Service, RegistryError> {
        self.service_mut(host_name, description).ok_or_else(|| RegistryError::ServiceNotFound {
            host: host_name.to_string(),
            description: description.to_string(),
        })
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn services_for_host<'a>(&'a self, host_name: &'a str) -> impl Iterator<Item = &'a Service> {
        self.services.iter().filter(move |((h, _), _)| h == host_name).map(|(_, s)| s)
    }

    pub fn remove_service(&mut self, host_name: &str, description: &str) -> Option<Service> {
        self.services.shift_remove(&(host_name.to_string(), description.to_string()))
    }

    // -- contacts / groups ----------------------------------------------

    pub fn insert_contact(&mut self, contact: Contact) {
        self.contacts.insert(contact.name.clone(), contact);
    }

    pub fn contact(&self, name: &str) -> Option<&Contact> {
        self.contacts.get(name)
    }

    pub fn contact_mut(&mut self, name: &str) -> Option<&mut Contact> {
        self.contacts.get_mut(name)
    }

    pub fn require_contact_mut(&mut self, name: &str) -> Result<&mut Contact, RegistryError> {
        self.contacts
            .get_mut(name)
            .ok_or_else(|| RegistryError::ContactNotFound(name.to_string()))
    }

    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn insert_contact_group(&mut self, group: ContactGroup) {
        self.contact_groups.insert(group.id.as_str().to_string(), group);
    }

    pub fn contact_group(&self, name: &str) -> Option<&ContactGroup> {
        self.contact_groups.get(name)
    }

    pub fn insert_host_group(&mut self, group: HostGroup) {
        self.host_groups.insert(group.id.as_str().to_string(), group);
    }

    pub fn host_group(&self, name: &str) -> Option<&HostGroup> {
        self.host_groups.get(name)
    }

    pub fn insert_service_group(&mut self, group: ServiceGroup) {
        self.service_groups.insert(group.id.as_str().to_string(), group);
    }

    pub fn service_group(&self, name: &str) -> Option<&ServiceGroup> {
        self.service_groups.get(name)
    }

    // -- commands / connectors -------------------------------------------

    pub fn insert_command(&mut self, command: Command) {
        self.commands.insert(command.id.as_str().to_string(), command);
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn require_command(&self, name: &str) -> Result<&Command, RegistryError> {
        self.command(name).ok_or_else(|| RegistryError::CommandNotFound(name.to_string()))
    }

    pub fn insert_connector(&mut self, connector: Connector) {
        self.connectors.insert(connector.id.as_str().to_string(), connector);
    }

    pub fn connector(&self, name: &str) -> Option<&Connector> {
        self.connectors.get(name)
    }

    // -- timeperiods ------------------------------------------------------

    pub fn insert_timeperiod(&mut self, tp: TimePeriod) {
        self.timeperiods.insert(tp.name.clone(), tp);
    }

    pub fn timeperiod(&self, name: &str) -> Option<&TimePeriod> {
        self.timeperiods.get(name)
    }

    pub fn require_timeperiod(&self, name: &str) -> Result<&TimePeriod, RegistryError> {
        self.timeperiod(name).ok_or_else(|| RegistryError::TimePeriodNotFound(name.to_string()))
    }

    // -- dependencies / escalations ----------------------------------------

    pub fn add_dependency(&mut self, dep: Dependency) {
        self.dependencies.push(dep);
    }

    /// Dependencies whose dependent matches `(host_name, service_description)`.
    pub fn dependencies_for<'a>(
        &'a self,
        host_name: &'a str,
        service_description: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Dependency> {
        self.dependencies.iter().filter(move |d| {
            d.dependent_host_name == host_name && d.dependent_service_description.as_deref() == service_description
        })
    }

    pub fn add_escalation(&mut self, esc: Escalation) {
        self.escalations.push(esc);
    }

    /// Escalations targeting `(host_name, service_description)`.
    pub fn escalations_for<'a>(
        &'a self,
        host_name: &'a str,
        service_description: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Escalation> {
        self.escalations
            .iter()
            .filter(move |e| e.host_name == host_name && e.service_description.as_deref() == service_description)
    }

    // -- downtimes --------------------------------------------------------

    /// Allocates a `DowntimeId` and stores `downtime`, overwriting its id
    /// field with the freshly allocated one.
    pub fn create_downtime(&mut self, mut downtime: Downtime) -> DowntimeId {
        let id = DowntimeId::new(self.downtime_ids.next_u64());
        downtime.id = id;
        self.downtimes.insert(id.get(), downtime);
        id
    }

    pub fn downtime(&self, id: DowntimeId) -> Option<&Downtime> {
        self.downtimes.get(&id.get())
    }

    pub fn downtime_mut(&mut self, id: DowntimeId) -> Option<&mut Downtime> {
        self.downtimes.get_mut(&id.get())
    }

    pub fn remove_downtime(&mut self, id: DowntimeId) -> Option<Downtime> {
        self.downtimes.shift_remove(&id.get())
    }

    pub fn downtimes(&self) -> impl Iterator<Item = &Downtime> {
        self.downtimes.values()
    }

    /// Inserts a downtime that already carries its own id (a seed or
    /// retention restore, spec.md §6), advancing the id generator past it
    /// so a later `create_downtime` never reissues it.
    pub fn restore_downtime(&mut self, downtime: Downtime) {
        self.downtime_ids.observe(downtime.id.get());
        self.downtimes.insert(downtime.id.get(), downtime);
    }

    pub fn downtimes_for<'a>(
        &'a self,
        host_name: &'a str,
        service_description: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Downtime> {
        self.downtimes
            .values()
            .filter(move |d| d.host_name == host_name && d.service_description.as_deref() == service_description)
    }

    // -- comments ---------------------------------------------------------

    pub fn create_comment(
        &mut self,
        host_name: impl Into<String>,
        service_description: Option<String>,
        source: CommentSource,
        entry_type: EntryType,
        author: impl Into<String>,
        text: impl Into<String>,
        entry_time: i64,
    ) -> CommentId {
        let id = CommentId::new(self.comment_ids.next_u64());
        let mut comment = Comment::new(id, host_name, source, entry_type, author, text, entry_time);
        comment.service_description = service_description;
        self.comments.insert(id.get(), comment);
        id
    }

    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(&id.get())
    }

    pub fn remove_comment(&mut self, id: CommentId) -> Option<Comment> {
        self.comments.shift_remove(&id.get())
    }

    /// Inserts a comment that already carries its own id (a seed or
    /// retention restore, spec.md §6), advancing the id generator past it.
    pub fn restore_comment(&mut self, comment: Comment) {
        self.comment_ids.observe(comment.id.get());
        self.comments.insert(comment.id.get(), comment);
    }

    pub fn comments_for<'a>(
        &'a self,
        host_name: &'a str,
        service_description: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Comment> {
        self.comments
            .values()
            .filter(move |c| c.host_name == host_name && c.service_description.as_deref() == service_description)
    }

    /// Drops every expired comment at `now`, returning how many were removed.
    pub fn expire_comments(&mut self, now: i64) -> usize {
        let before = self.comments.len();
        self.comments.retain(|_, c| !c.is_expired_at(now));
        before - self.comments.len()
    }

    // -- problem ids --------------------------------------------------------

    /// The next monotonic problem id, assigned when a notifier first goes
    /// hard-bad (spec.md §3/§4.3).
    pub fn next_problem_id(&self) -> ProblemId {
        ProblemId::new(self.problem_ids.next_u64())
    }

    // -- group membership (also used by `ward_macros::MacroLookup`) --------

    pub fn hostgroup_member_names(&self, name: &str) -> Option<Vec<String>> {
        self.host_groups.get(name).map(|g| g.members.iter().map(|id| id.as_str().to_string()).collect())
    }

    pub fn servicegroup_member_pairs(&self, name: &str) -> Option<Vec<(String, String)>> {
        self.service_groups.get(name).map(|g| {
            g.members
                .iter()
                .filter_map(|id| id.as_str().split_once('/'))
                .map(|(h, s)| (h.to_string(), s.to_string()))
                .collect()
        })
    }

    pub fn contactgroup_member_names(&self, name: &str) -> Option<Vec<String>> {
        self.contact_groups.get(name).map(|g| g.members.iter().map(|id| id.as_str().to_string()).collect())
    }
}

impl ward_time::TimePeriodLookup for Registry {
    fn resolve(&self, name: &str) -> Option<&TimePeriod> {
        self.timeperiod(name)
    }
}

impl ward_macros::MacroLookup for Registry {
    fn host(&self, name: &str) -> Option<&Host> {
        self.host(name)
    }

    fn service(&self, host_name: &str, description: &str) -> Option<&Service> {
        self.service(host_name, description)
    }

    fn contact(&self, name: &str) -> Option<&Contact> {
        self.contact(name)
    }

    fn timeperiod(&self, name: &str) -> Option<&TimePeriod> {
        self.timeperiod(name)
    }

    fn hostgroup_members(&self, name: &str) -> Option<Vec<String>> {
        self.hostgroup_member_names(name)
    }

    fn servicegroup_members(&self, name: &str) -> Option<Vec<(String, String)>> {
        self.servicegroup_member_pairs(name)
    }

    fn contactgroup_members(&self, name: &str) -> Option<Vec<String>> {
        self.contactgroup_member_names(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_core::CommandRef;

    fn host(name: &str) -> Host {
        Host::new(name, CommandRef::new("check_ping"))
    }

    #[test]
    fn new_registry_seeds_24x7() {
        let reg = Registry::new();
        assert!(reg.timeperiod("24x7").is_some());
    }

    #[test]
    fn duplicate_host_insert_is_rejected() {
        let mut reg = Registry::new();
        reg.insert_host(host("web1")).unwrap();
        assert!(matches!(reg.insert_host(host("web1")), Err(RegistryError::DuplicateHost(_))));
    }

    #[test]
    fn remove_host_cascades_to_its_services() {
        let mut reg = Registry::new();
        reg.insert_host(host("web1")).unwrap();
        let svc = Service::new(HostId::new("web1"), "http", CommandRef::new("check_http"));
        reg.insert_service(svc).unwrap();
        assert!(reg.service("web1", "http").is_some());
        reg.remove_host("web1");
        assert!(reg.service("web1", "http").is_none());
    }

    #[test]
    fn services_for_host_filters_by_owner() {
        let mut reg = Registry::new();
        reg.insert_host(host("web1")).unwrap();
        reg.insert_host(host("web2")).unwrap();
        reg.insert_service(Service::new(HostId::new("web1"), "http", CommandRef::new("check_http"))).unwrap();
        reg.insert_service(Service::new(HostId::new("web2"), "http", CommandRef::new("check_http"))).unwrap();
        let names: Vec<_> = reg.services_for_host("web1").map(|s| s.host_id.as_str().to_string()).collect();
        assert_eq!(names, vec!["web1".to_string()]);
    }

    #[test]
    fn downtime_ids_are_assigned_on_creation() {
        let mut reg = Registry::new();
        let dt = Downtime::new(DowntimeId::new(0), "web1", 1000, 2000, true, 0);
        let id = reg.create_downtime(dt);
        assert!(reg.downtime(id).is_some());
    }

    #[test]
    fn servicegroup_members_split_host_and_description() {
        let mut reg = Registry::new();
        let mut group = ServiceGroup::new("web-checks");
        group.members.push(ServiceId::new("web1/http"));
        reg.insert_service_group(group);
        let members = reg.servicegroup_member_pairs("web-checks").unwrap();
        assert_eq!(members, vec![("web1".to_string(), "http".to_string())]);
    }
}
