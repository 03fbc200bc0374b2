use graphsign_core::Error;
use std::fmt;
use std::str::FromStr;

/// Logical actions a signed request can target.
///
/// Each action maps to a fixed endpoint path on the database host. The
/// mapping is closed: unknown action names fail with
/// [`ErrorKind::InvalidAction`](graphsign_core::ErrorKind::InvalidAction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// SPARQL query endpoint.
    Sparql,
    /// SPARQL update endpoint, served on the same path as queries.
    SparqlUpdate,
    /// Gremlin traversal endpoint.
    Gremlin,
    /// Gremlin query status endpoint.
    GremlinStatus,
    /// Gremlin explain endpoint.
    GremlinExplain,
    /// Gremlin profile endpoint.
    GremlinProfile,
    /// Bulk loader endpoint.
    Loader,
    /// Instance status endpoint.
    Status,
    /// System operations endpoint.
    System,
    /// SPARQL query status endpoint.
    SparqlStatus,
}

impl Action {
    /// All known actions.
    pub const ALL: [Action; 10] = [
        Action::Sparql,
        Action::SparqlUpdate,
        Action::Gremlin,
        Action::GremlinStatus,
        Action::GremlinExplain,
        Action::GremlinProfile,
        Action::Loader,
        Action::Status,
        Action::System,
        Action::SparqlStatus,
    ];

    /// The fixed URI path this action is served on.
    pub fn canonical_uri(&self) -> &'static str {
        match self {
            Action::Sparql | Action::SparqlUpdate => "/sparql/",
            Action::Gremlin => "/gremlin",
            Action::GremlinStatus => "/gremlin/status",
            Action::GremlinExplain => "/gremlin/explain",
            Action::GremlinProfile => "/gremlin/profile",
            Action::Loader => "/loader",
            Action::Status => "/status",
            Action::System => "/system",
            Action::SparqlStatus => "/sparql/status",
        }
    }

    /// Whether the caller payload takes part in signing.
    ///
    /// The gremlin endpoint discards the caller payload entirely: its
    /// requests are always signed over an empty parameter set.
    pub(crate) fn signs_payload(&self) -> bool {
        !matches!(self, Action::Gremlin)
    }

    /// The action name as it appears in caller requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Sparql => "sparql",
            Action::SparqlUpdate => "sparqlupdate",
            Action::Gremlin => "gremlin",
            Action::GremlinStatus => "gremlin/status",
            Action::GremlinExplain => "gremlin/explain",
            Action::GremlinProfile => "gremlin/profile",
            Action::Loader => "loader",
            Action::Status => "status",
            Action::System => "system",
            Action::SparqlStatus => "sparql/status",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sparql" => Ok(Action::Sparql),
            "sparqlupdate" => Ok(Action::SparqlUpdate),
            "gremlin" => Ok(Action::Gremlin),
            "gremlin/status" => Ok(Action::GremlinStatus),
            "gremlin/explain" => Ok(Action::GremlinExplain),
            "gremlin/profile" => Ok(Action::GremlinProfile),
            "loader" => Ok(Action::Loader),
            "status" => Ok(Action::Status),
            "system" => Ok(Action::System),
            "sparql/status" => Ok(Action::SparqlStatus),
            _ => Err(Error::invalid_action(format!("unknown action: {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphsign_core::ErrorKind;
    use test_case::test_case;

    #[test_case(Action::Sparql, "/sparql/")]
    #[test_case(Action::SparqlUpdate, "/sparql/")]
    #[test_case(Action::Gremlin, "/gremlin")]
    #[test_case(Action::GremlinStatus, "/gremlin/status")]
    #[test_case(Action::GremlinExplain, "/gremlin/explain")]
    #[test_case(Action::GremlinProfile, "/gremlin/profile")]
    #[test_case(Action::Loader, "/loader")]
    #[test_case(Action::Status, "/status")]
    #[test_case(Action::System, "/system")]
    #[test_case(Action::SparqlStatus, "/sparql/status")]
    fn test_canonical_uri(action: Action, expected: &str) {
        assert_eq!(action.canonical_uri(), expected);
    }

    #[test]
    fn test_round_trip() {
        for action in Action::ALL {
            let parsed: Action = action.as_str().parse().expect("known action must parse");
            assert_eq!(parsed, action);
        }
    }

    #[test_case("graph"; "unknown name")]
    #[test_case("sparql/"; "trailing slash")]
    #[test_case("GREMLIN"; "wrong case")]
    #[test_case(""; "empty")]
    fn test_unknown_action(input: &str) {
        let err = input.parse::<Action>().expect_err("must be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidAction);
    }

    #[test]
    fn test_only_gremlin_drops_payload() {
        for action in Action::ALL {
            assert_eq!(action.signs_payload(), action != Action::Gremlin);
        }
    }
}
