// src/config/options.rs
use std::time::Duration;

use super::consts::*;

/// Fixed-offset parsing rules for roster marker blocks.
/// Tied to one site's markup, so kept as data rather than literals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterRules {
    pub marker_class: String,
    /// Characters dropped from line 1 to get the id
    pub id_prefix_len: usize,
    /// Characters dropped from line 5 before the wing/cell split
    pub wing_prefix_len: usize,
}

impl Default for RosterRules {
    fn default() -> Self {
        Self {
            marker_class: s!(MARKER_CLASS),
            id_prefix_len: ID_PREFIX_LEN,
            wing_prefix_len: WING_PREFIX_LEN,
        }
    }
}

/// Everything a run needs to know about the remote portal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalOptions {
    pub login_url: String,
    pub roster_url: String,
    /// `{id}` is replaced by the record id
    pub cadastral_url_tmpl: String,
    pub descriptive_url_tmpl: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// How long the worker blocks on the answer channel between cancel checks
    pub answer_poll: Duration,
    pub roster: RosterRules,
}

impl Default for PortalOptions {
    fn default() -> Self {
        Self {
            login_url: s!(LOGIN_URL),
            roster_url: s!(ROSTER_URL),
            cadastral_url_tmpl: s!(CADASTRAL_URL_TMPL),
            descriptive_url_tmpl: s!(DESCRIPTIVE_URL_TMPL),
            user_agent: s!(USER_AGENT),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            answer_poll: Duration::from_millis(ANSWER_POLL_MS),
            roster: RosterRules::default(),
        }
    }
}

impl PortalOptions {
    pub fn cadastral_url(&self, id: &str) -> String {
        build_url(&self.cadastral_url_tmpl, id)
    }

    pub fn descriptive_url(&self, id: &str) -> String {
        build_url(&self.descriptive_url_tmpl, id)
    }
}

pub fn build_url(tmpl: &str, id: &str) -> String {
    tmpl.replace("{id}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_urls_substitute_id() {
        let opts = PortalOptions::default();
        assert!(opts.cadastral_url("123").ends_with("cadastro.php?id_cad_preso=123"));
        assert!(opts.descriptive_url("9").ends_with("Informes_LER.php?id_cad_preso=9"));
    }

    #[test]
    fn default_rules_match_portal_markup() {
        let r = RosterRules::default();
        assert_eq!(r.marker_class, "titulobkSingCAPS");
        assert_eq!((r.id_prefix_len, r.wing_prefix_len), (3, 5));
    }
}
