// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of standard indexed macros (`$HOSTNAME$`, `$SERVICESTATE$`,
//! ...). Names and ordinals are fixed by the external-interface
//! compatibility contract, not something an implementation is free to
//! renumber.

/// Number of standard macro slots in the closed set.
pub const STANDARD_MACRO_COUNT: usize = 153;

macro_rules! standard_macros {
    ($($variant:ident => $name:literal = $ord:expr),+ $(,)?) => {
        /// A single standard macro identity.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(clippy::upper_case_acronyms)]
        pub enum StandardMacro {
            $($variant),+
        }

        impl StandardMacro {
            pub const ALL: &'static [StandardMacro] = &[$(StandardMacro::$variant),+];

            /// Parse a bare macro name (no surrounding `$`) into its identity.
            pub fn from_name(name: &str) -> Option<StandardMacro> {
                match name {
                    $($name => Some(StandardMacro::$variant),)+
                    _ => None,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(StandardMacro::$variant => $name),+
                }
            }

            /// Historical ordinal in the closed table (`MACRO_X_COUNT` in
            /// the original implementation). Not used for lookup here, kept
            /// for log lines and diagnostics that reference the table
            /// position.
            pub fn ordinal(&self) -> usize {
                match self {
                    $(StandardMacro::$variant => $ord),+
                }
            }
        }
    };
}

standard_macros! {
    HostName => "HOSTNAME" = 0,
    HostAlias => "HOSTALIAS" = 1,
    HostAddress => "HOSTADDRESS" = 2,
    ServiceDesc => "SERVICEDESC" = 3,
    ServiceState => "SERVICESTATE" = 4,
    ServiceStateId => "SERVICESTATEID" = 5,
    ServiceAttempt => "SERVICEATTEMPT" = 6,
    LongDateTime => "LONGDATETIME" = 7,
    ShortDateTime => "SHORTDATETIME" = 8,
    Date => "DATE" = 9,
    Time => "TIME" = 10,
    TimeT => "TIMET" = 11,
    LastHostCheck => "LASTHOSTCHECK" = 12,
    LastServiceCheck => "LASTSERVICECHECK" = 13,
    LastHostStateChange => "LASTHOSTSTATECHANGE" = 14,
    LastServiceStateChange => "LASTSERVICESTATECHANGE" = 15,
    HostOutput => "HOSTOUTPUT" = 16,
    ServiceOutput => "SERVICEOUTPUT" = 17,
    HostPerfdata => "HOSTPERFDATA" = 18,
    ServicePerfdata => "SERVICEPERFDATA" = 19,
    ContactName => "CONTACTNAME" = 20,
    ContactAlias => "CONTACTALIAS" = 21,
    ContactEmail => "CONTACTEMAIL" = 22,
    ContactPager => "CONTACTPAGER" = 23,
    AdminEmail => "ADMINEMAIL" = 24,
    AdminPager => "ADMINPAGER" = 25,
    HostState => "HOSTSTATE" = 26,
    HostStateId => "HOSTSTATEID" = 27,
    HostAttempt => "HOSTATTEMPT" = 28,
    NotificationType => "NOTIFICATIONTYPE" = 29,
    NotificationNumber => "NOTIFICATIONNUMBER" = 30,
    HostExecutionTime => "HOSTEXECUTIONTIME" = 31,
    ServiceExecutionTime => "SERVICEEXECUTIONTIME" = 32,
    HostLatency => "HOSTLATENCY" = 33,
    ServiceLatency => "SERVICELATENCY" = 34,
    HostDuration => "HOSTDURATION" = 35,
    ServiceDuration => "SERVICEDURATION" = 36,
    HostDurationSec => "HOSTDURATIONSEC" = 37,
    ServiceDurationSec => "SERVICEDURATIONSEC" = 38,
    HostDowntime => "HOSTDOWNTIME" = 39,
    ServiceDowntime => "SERVICEDOWNTIME" = 40,
    HostStateType => "HOSTSTATETYPE" = 41,
    ServiceStateType => "SERVICESTATETYPE" = 42,
    HostPercentChange => "HOSTPERCENTCHANGE" = 43,
    ServicePercentChange => "SERVICEPERCENTCHANGE" = 44,
    HostGroupName => "HOSTGROUPNAME" = 45,
    HostGroupAlias => "HOSTGROUPALIAS" = 46,
    ServiceGroupName => "SERVICEGROUPNAME" = 47,
    ServiceGroupAlias => "SERVICEGROUPALIAS" = 48,
    HostAckAuthor => "HOSTACKAUTHOR" = 49,
    HostAckComment => "HOSTACKCOMMENT" = 50,
    ServiceAckAuthor => "SERVICEACKAUTHOR" = 51,
    ServiceAckComment => "SERVICEACKCOMMENT" = 52,
    LastServiceOk => "LASTSERVICEOK" = 53,
    LastServiceWarning => "LASTSERVICEWARNING" = 54,
    LastServiceUnknown => "LASTSERVICEUNKNOWN" = 55,
    LastServiceCritical => "LASTSERVICECRITICAL" = 56,
    LastHostUp => "LASTHOSTUP" = 57,
    LastHostDown => "LASTHOSTDOWN" = 58,
    LastHostUnreachable => "LASTHOSTUNREACHABLE" = 59,
    ServiceCheckCommand => "SERVICECHECKCOMMAND" = 60,
    HostCheckCommand => "HOSTCHECKCOMMAND" = 61,
    MainConfigFile => "MAINCONFIGFILE" = 62,
    StatusDataFile => "STATUSDATAFILE" = 63,
    HostDisplayName => "HOSTDISPLAYNAME" = 64,
    ServiceDisplayName => "SERVICEDISPLAYNAME" = 65,
    RetentionDataFile => "RETENTIONDATAFILE" = 66,
    ObjectCacheFile => "OBJECTCACHEFILE" = 67,
    TempFile => "TEMPFILE" = 68,
    LogFile => "LOGFILE" = 69,
    ResourceFile => "RESOURCEFILE" = 70,
    CommandFile => "COMMANDFILE" = 71,
    HostPerfdataFile => "HOSTPERFDATAFILE" = 72,
    ServicePerfdataFile => "SERVICEPERFDATAFILE" = 73,
    HostActionUrl => "HOSTACTIONURL" = 74,
    HostNotesUrl => "HOSTNOTESURL" = 75,
    HostNotes => "HOSTNOTES" = 76,
    ServiceActionUrl => "SERVICEACTIONURL" = 77,
    ServiceNotesUrl => "SERVICENOTESURL" = 78,
    ServiceNotes => "SERVICENOTES" = 79,
    TotalHostsUp => "TOTALHOSTSUP" = 80,
    TotalHostsDown => "TOTALHOSTSDOWN" = 81,
    TotalHostsUnreachable => "TOTALHOSTSUNREACHABLE" = 82,
    TotalHostsDownUnhandled => "TOTALHOSTSDOWNUNHANDLED" = 83,
    TotalHostsUnreachableUnhandled => "TOTALHOSTSUNREACHABLEUNHANDLED" = 84,
    TotalHostProblems => "TOTALHOSTPROBLEMS" = 85,
    TotalHostProblemsUnhandled => "TOTALHOSTPROBLEMSUNHANDLED" = 86,
    TotalServicesOk => "TOTALSERVICESOK" = 87,
    TotalServicesWarning => "TOTALSERVICESWARNING" = 88,
    TotalServicesCritical => "TOTALSERVICESCRITICAL" = 89,
    TotalServicesUnknown => "TOTALSERVICESUNKNOWN" = 90,
    TotalServicesWarningUnhandled => "TOTALSERVICESWARNINGUNHANDLED" = 91,
    TotalServicesCriticalUnhandled => "TOTALSERVICESCRITICALUNHANDLED" = 92,
    TotalServicesUnknownUnhandled => "TOTALSERVICESUNKNOWNUNHANDLED" = 93,
    TotalServiceProblems => "TOTALSERVICEPROBLEMS" = 94,
    TotalServiceProblemsUnhandled => "TOTALSERVICEPROBLEMSUNHANDLED" = 95,
    ProcessStartTime => "PROCESSSTARTTIME" = 96,
    HostCheckType => "HOSTCHECKTYPE" = 97,
    ServiceCheckType => "SERVICECHECKTYPE" = 98,
    LongHostOutput => "LONGHOSTOUTPUT" = 99,
    LongServiceOutput => "LONGSERVICEOUTPUT" = 100,
    TempPath => "TEMPPATH" = 101,
    HostNotificationNumber => "HOSTNOTIFICATIONNUMBER" = 102,
    ServiceNotificationNumber => "SERVICENOTIFICATIONNUMBER" = 103,
    HostNotificationId => "HOSTNOTIFICATIONID" = 104,
    ServiceNotificationId => "SERVICENOTIFICATIONID" = 105,
    HostEventId => "HOSTEVENTID" = 106,
    LastHostEventId => "LASTHOSTEVENTID" = 107,
    ServiceEventId => "SERVICEEVENTID" = 108,
    LastServiceEventId => "LASTSERVICEEVENTID" = 109,
    HostGroupNames => "HOSTGROUPNAMES" = 110,
    ServiceGroupNames => "SERVICEGROUPNAMES" = 111,
    HostAckAuthorName => "HOSTACKAUTHORNAME" = 112,
    HostAckAuthorAlias => "HOSTACKAUTHORALIAS" = 113,
    ServiceAckAuthorName => "SERVICEACKAUTHORNAME" = 114,
    ServiceAckAuthorAlias => "SERVICEACKAUTHORALIAS" = 115,
    MaxHostAttempts => "MAXHOSTATTEMPTS" = 116,
    MaxServiceAttempts => "MAXSERVICEATTEMPTS" = 117,
    ServiceIsVolatile => "SERVICEISVOLATILE" = 118,
    TotalHostServices => "TOTALHOSTSERVICES" = 119,
    TotalHostServicesOk => "TOTALHOSTSERVICESOK" = 120,
    TotalHostServicesWarning => "TOTALHOSTSERVICESWARNING" = 121,
    TotalHostServicesUnknown => "TOTALHOSTSERVICESUNKNOWN" = 122,
    TotalHostServicesCritical => "TOTALHOSTSERVICESCRITICAL" = 123,
    HostGroupNotes => "HOSTGROUPNOTES" = 124,
    HostGroupNotesUrl => "HOSTGROUPNOTESURL" = 125,
    HostGroupActionUrl => "HOSTGROUPACTIONURL" = 126,
    ServiceGroupNotes => "SERVICEGROUPNOTES" = 127,
    ServiceGroupNotesUrl => "SERVICEGROUPNOTESURL" = 128,
    ServiceGroupActionUrl => "SERVICEGROUPACTIONURL" = 129,
    HostGroupMembers => "HOSTGROUPMEMBERS" = 130,
    ServiceGroupMembers => "SERVICEGROUPMEMBERS" = 131,
    ContactGroupName => "CONTACTGROUPNAME" = 132,
    ContactGroupAlias => "CONTACTGROUPALIAS" = 133,
    ContactGroupMembers => "CONTACTGROUPMEMBERS" = 134,
    ContactGroupNames => "CONTACTGROUPNAMES" = 135,
    NotificationRecipients => "NOTIFICATIONRECIPIENTS" = 136,
    NotificationIsEscalated => "NOTIFICATIONISESCALATED" = 137,
    NotificationAuthor => "NOTIFICATIONAUTHOR" = 138,
    NotificationAuthorName => "NOTIFICATIONAUTHORNAME" = 139,
    NotificationAuthorAlias => "NOTIFICATIONAUTHORALIAS" = 140,
    NotificationComment => "NOTIFICATIONCOMMENT" = 141,
    EventStartTime => "EVENTSTARTTIME" = 142,
    HostProblemId => "HOSTPROBLEMID" = 143,
    LastHostProblemId => "LASTHOSTPROBLEMID" = 144,
    ServiceProblemId => "SERVICEPROBLEMID" = 145,
    LastServiceProblemId => "LASTSERVICEPROBLEMID" = 146,
    IsValidTime => "ISVALIDTIME" = 147,
    NextValidTime => "NEXTVALIDTIME" = 148,
    LastHostState => "LASTHOSTSTATE" = 149,
    LastHostStateId => "LASTHOSTSTATEID" = 150,
    LastServiceState => "LASTSERVICESTATE" = 151,
    LastServiceStateId => "LASTSERVICESTATEID" = 152,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_size_matches_the_closed_set() {
        assert_eq!(StandardMacro::ALL.len(), STANDARD_MACRO_COUNT);
    }

    #[test]
    fn ordinals_are_unique_and_dense() {
        let mut ordinals: Vec<usize> = StandardMacro::ALL.iter().map(|m| m.ordinal()).collect();
        ordinals.sort_unstable();
        let expected: Vec<usize> = (0..STANDARD_MACRO_COUNT).collect();
        assert_eq!(ordinals, expected);
    }

    #[test]
    fn from_name_roundtrips_with_name() {
        for m in StandardMacro::ALL {
            assert_eq!(StandardMacro::from_name(m.name()), Some(*m));
        }
    }

    #[test]
    fn unknown_name_is_not_standard() {
        assert_eq!(StandardMacro::from_name("NOTAMACRO"), None);
    }

    #[test]
    fn isvalidtime_and_nextvalidtime_are_on_demand_capable() {
        // These two take `:tp:t` arguments in practice even though they
        // live in the closed ordinal table; the resolver handles that via
        // their argument list, not via a separate enum.
        assert!(StandardMacro::from_name("ISVALIDTIME").is_some());
        assert!(StandardMacro::from_name("NEXTVALIDTIME").is_some());
    }
}
