//! Static route table: topic name → exemplar utterances.
//!
//! Exemplars are embedded once at startup and matched against incoming text
//! by cosine similarity. The table is immutable after load and shared
//! read-only across all sessions.

/// One semantic route: a name plus the utterances that define its region of
/// embedding space.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    /// Route name returned on a match.
    pub name: &'static str,
    /// Exemplar utterances for this route.
    pub utterances: &'static [&'static str],
}

/// Exemplars for the "paul" route.
static PAUL_UTTERANCES: &[&str] = &[
    "who is paul allen",
    "tell me about paul allen",
    "what did paul allen do at microsoft",
    "how did paul allen and bill gates meet",
    "which companies did paul allen found",
    "what sports teams did the microsoft co-founder own",
    "tell me about the allen institute for brain science",
    "what is stratolaunch",
    "what did paul allen donate to",
    "when did paul allen leave microsoft",
    "what was paul allen's yacht called",
    "which books did paul allen write",
];

static ROUTES: &[Route] = &[Route {
    name: "paul",
    utterances: PAUL_UTTERANCES,
}];

/// The process-wide route table.
pub fn route_table() -> &'static [Route] {
    ROUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_the_paul_route() {
        let routes = route_table();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name, "paul");
        assert!(!routes[0].utterances.is_empty());
    }
}
