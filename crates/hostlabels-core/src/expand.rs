//! Placeholder expansion for label values.
//!
//! A value may embed `$(token)` placeholders that are replaced with host
//! facts when labels are rendered. Unknown tokens are replaced by their own
//! name, and a `$(` without a closing `)` is kept as literal text.

use std::borrow::Cow;
use std::cell::OnceCell;

use crate::error::CoreError;
use crate::facts::{FactProvider, NetworkFacts, NetworkInterface, OsInfo};
use crate::labels::Label;

/// Default upper bound, in bytes, for a single expanded value.
pub const DEFAULT_EXPANSION_CAPACITY: usize = 1024;

const OPEN: &str = "$(";
const CLOSE: char = ')';

// ==============================================================================
// Token Registry
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    OsName,
    OsVersion,
    Hostname,
    Timezone,
    Ipv4Primary,
    Ipv6Primary,
    Ipv4Others,
    Ipv6Others,
    MacPrimary,
    MacOthers,
}

impl Token {
    pub const ALL: [Token; 10] = [
        Self::OsName,
        Self::OsVersion,
        Self::Hostname,
        Self::Timezone,
        Self::Ipv4Primary,
        Self::Ipv6Primary,
        Self::Ipv4Others,
        Self::Ipv6Others,
        Self::MacPrimary,
        Self::MacOthers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::OsName => "os.name",
            Self::OsVersion => "os.version",
            Self::Hostname => "hostname",
            Self::Timezone => "timezone",
            Self::Ipv4Primary => "ipv4.primary",
            Self::Ipv6Primary => "ipv6.primary",
            Self::Ipv4Others => "ipv4.others",
            Self::Ipv6Others => "ipv6.others",
            Self::MacPrimary => "mac.primary",
            Self::MacOthers => "mac.others",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|token| token.name() == name)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ==============================================================================
// Expander
// ==============================================================================

/// Expands placeholders against a borrowed [`FactProvider`].
///
/// Each call owns its own output buffer and fact cache, so one `Expander`
/// can serve any number of calls and the provider is queried at most once
/// per fact category per call.
pub struct Expander<'a, F: FactProvider + ?Sized> {
    facts: &'a F,
    capacity: usize,
}

impl<'a, F: FactProvider + ?Sized> Expander<'a, F> {
    pub fn new(facts: &'a F) -> Self {
        Self::with_capacity(facts, DEFAULT_EXPANSION_CAPACITY)
    }

    /// The expanded text must stay strictly below `capacity` bytes.
    pub fn with_capacity(facts: &'a F, capacity: usize) -> Self {
        Self { facts, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn expand(&self, label: &Label) -> Result<String, CoreError> {
        self.expand_value(&label.value)
    }

    /// Expand every placeholder in `value`.
    ///
    /// On overflow the returned `CoreError::ExpansionOverflow` carries the
    /// text accumulated before the chunk that did not fit.
    pub fn expand_value(&self, value: &str) -> Result<String, CoreError> {
        let mut out = Accumulator::new(self.capacity);
        let facts = FactCache::new(self.facts);
        let mut rest = value;

        while let Some(start) = rest.find(OPEN) {
            out.push(&rest[..start])?;

            let body = &rest[start + OPEN.len()..];
            let Some(end) = body.find(CLOSE) else {
                // Unterminated placeholder: the tail is kept verbatim below.
                rest = &rest[start..];
                break;
            };

            let name = &body[..end];
            out.push(&facts.resolve(name))?;
            rest = &body[end + 1..];
        }

        out.push(rest)?;
        Ok(out.finish())
    }
}

// ==============================================================================
// Bounded Accumulator
// ==============================================================================

struct Accumulator {
    buf: String,
    capacity: usize,
}

impl Accumulator {
    fn new(capacity: usize) -> Self {
        Self {
            buf: String::new(),
            capacity,
        }
    }

    fn push(&mut self, chunk: &str) -> Result<(), CoreError> {
        if chunk.is_empty() {
            return Ok(());
        }
        if self.buf.len() + chunk.len() >= self.capacity {
            return Err(CoreError::ExpansionOverflow {
                capacity: self.capacity,
                partial: std::mem::take(&mut self.buf),
            });
        }
        self.buf.push_str(chunk);
        Ok(())
    }

    fn finish(self) -> String {
        self.buf
    }
}

// ==============================================================================
// Per-call Fact Cache
// ==============================================================================

struct FactCache<'a, F: FactProvider + ?Sized> {
    provider: &'a F,
    os: OnceCell<Option<OsInfo>>,
    network: OnceCell<Option<NetworkFacts>>,
    utc_offset: OnceCell<Option<i32>>,
}

impl<'a, F: FactProvider + ?Sized> FactCache<'a, F> {
    fn new(provider: &'a F) -> Self {
        Self {
            provider,
            os: OnceCell::new(),
            network: OnceCell::new(),
            utc_offset: OnceCell::new(),
        }
    }

    fn os(&self) -> Option<&OsInfo> {
        self.os
            .get_or_init(|| log_failure("os", self.provider.os_info()))
            .as_ref()
    }

    fn network(&self) -> Option<&NetworkFacts> {
        self.network
            .get_or_init(|| log_failure("network", self.provider.network()))
            .as_ref()
    }

    fn utc_offset(&self) -> Option<i32> {
        *self
            .utc_offset
            .get_or_init(|| log_failure("timezone", self.provider.utc_offset_seconds()))
    }

    /// Resolve a placeholder name. Unknown names, and known names whose
    /// facts are unavailable, resolve to the name itself.
    fn resolve<'n>(&self, name: &'n str) -> Cow<'n, str> {
        let Some(token) = Token::from_name(name) else {
            tracing::trace!(token = name, "unknown placeholder left as its name");
            return Cow::Borrowed(name);
        };
        match self.lookup(token) {
            Some(value) => Cow::Owned(value),
            None => Cow::Borrowed(name),
        }
    }

    fn lookup(&self, token: Token) -> Option<String> {
        let value = match token {
            Token::OsName => self.os()?.name.clone(),
            Token::OsVersion => self.os()?.version.clone(),
            Token::Hostname => self.os()?.hostname.clone(),
            // Whole hours, truncated toward zero.
            Token::Timezone => (self.utc_offset()? / 3600).to_string(),
            Token::Ipv4Primary => primary(self.network()?, |i| first(&i.ipv4)),
            Token::Ipv6Primary => primary(self.network()?, |i| first(&i.ipv6)),
            Token::MacPrimary => primary(self.network()?, |i| i.mac.clone()),
            Token::Ipv4Others => others(self.network()?, |i| join(&i.ipv4)),
            Token::Ipv6Others => others(self.network()?, |i| join(&i.ipv6)),
            Token::MacOthers => others(self.network()?, |i| i.mac.clone()),
        };
        Some(value)
    }
}

fn log_failure<T>(fact: &str, result: Result<T, CoreError>) -> Option<T> {
    result
        .map_err(|err| {
            tracing::warn!(fact, error = %err, "system fact unavailable; placeholders keep their names")
        })
        .ok()
}

fn first<T: ToString>(items: &[T]) -> Option<String> {
    items.first().map(ToString::to_string)
}

fn join<T: ToString>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    )
}

fn primary(net: &NetworkFacts, field: impl Fn(&NetworkInterface) -> Option<String>) -> String {
    net.primary_interface().and_then(field).unwrap_or_default()
}

fn others(net: &NetworkFacts, field: impl Fn(&NetworkInterface) -> Option<String>) -> String {
    net.others().filter_map(field).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::facts::{NetworkInterface, StaticFacts};
    use crate::test_util::{eth0, eth1, sample_facts};

    fn expand(facts: &StaticFacts, value: &str) -> String {
        Expander::new(facts)
            .expand_value(value)
            .expect("expansion should fit")
    }

    #[test]
    fn token_names_round_trip() {
        for token in Token::ALL {
            assert_eq!(Token::from_name(token.name()), Some(token));
        }
        assert_eq!(Token::from_name("HOSTNAME"), None);
    }

    #[test]
    fn substitutes_hostname() {
        assert_eq!(expand(&sample_facts(), "$(hostname)-x"), "myhost-x");
    }

    #[test]
    fn substitutes_os_facts_between_literals() {
        assert_eq!(
            expand(&sample_facts(), "os=$(os.name) v$(os.version);"),
            "os=Linux v6.1.0;"
        );
    }

    #[test]
    fn unknown_token_becomes_its_name() {
        assert_eq!(expand(&sample_facts(), "$(unknown_token)"), "unknown_token");
        assert_eq!(expand(&sample_facts(), "a$()b"), "ab");
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(expand(&sample_facts(), "$(bar"), "$(bar");
        assert_eq!(
            expand(&sample_facts(), "$(hostname) and $(bar"),
            "myhost and $(bar"
        );
    }

    #[test]
    fn closing_paren_ends_token_even_with_nested_open() {
        assert_eq!(expand(&sample_facts(), "$($(hostname))"), "$(hostname)");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(expand(&sample_facts(), "plain (text) $ ("), "plain (text) $ (");
        assert_eq!(expand(&sample_facts(), ""), "");
    }

    #[test]
    fn primary_interface_tokens() {
        let facts = sample_facts();
        assert_eq!(expand(&facts, "$(ipv4.primary)"), "10.0.0.1");
        assert_eq!(expand(&facts, "$(ipv6.primary)"), "fd00::1");
        assert_eq!(expand(&facts, "$(mac.primary)"), "02:00:00:00:00:01");
    }

    #[test]
    fn others_tokens_skip_primary() {
        let facts = sample_facts();
        assert_eq!(expand(&facts, "$(ipv4.others)"), "10.0.0.2");
        assert_eq!(expand(&facts, "$(ipv6.others)"), "fd00::2");
        assert_eq!(expand(&facts, "$(mac.others)"), "02:00:00:00:00:02");
    }

    #[test]
    fn others_are_comma_joined_in_provider_order() {
        let facts = StaticFacts::builder()
            .with_interface(NetworkInterface::new("wlan0").with_ipv4(Ipv4Addr::new(192, 168, 1, 5)))
            .with_primary_interface(eth0())
            .with_interface(eth1().with_ipv4(Ipv4Addr::new(10, 0, 0, 3)))
            .with_interface(NetworkInterface::new("dummy0"))
            .build();
        assert_eq!(
            expand(&facts, "$(ipv4.others)"),
            "192.168.1.5,10.0.0.2,10.0.0.3"
        );
        assert_eq!(expand(&facts, "$(mac.others)"), "02:00:00:00:00:02");
    }

    #[test]
    fn missing_network_data_expands_to_empty() {
        let facts = StaticFacts::builder()
            .with_interface(NetworkInterface::new("eth0"))
            .build();
        assert_eq!(expand(&facts, "[$(ipv4.primary)]"), "[]");
        assert_eq!(expand(&facts, "[$(mac.primary)]"), "[]");
        assert_eq!(expand(&facts, "[$(ipv6.others)]"), "[]");

        let only_primary = StaticFacts::builder().with_primary_interface(eth0()).build();
        assert_eq!(expand(&only_primary, "[$(ipv4.others)]"), "[]");
    }

    #[test]
    fn timezone_is_whole_hours_toward_zero() {
        let cases = [(7200, "2"), (0, "0"), (19800, "5"), (-12600, "-3"), (-18000, "-5")];
        for (offset, expected) in cases {
            let facts = StaticFacts::builder()
                .with_utc_offset_seconds(offset)
                .build();
            assert_eq!(expand(&facts, "$(timezone)"), expected, "offset {offset}");
        }
    }

    #[test]
    fn expand_uses_label_value() {
        let facts = sample_facts();
        let label = Label::new("host", "$(hostname)", true);
        assert_eq!(Expander::new(&facts).expand(&label).expect("expand"), "myhost");
        assert_eq!(label.value, "$(hostname)");
    }

    // -- capacity -------------------------------------------------------------

    #[test]
    fn overflow_keeps_accumulated_prefix() {
        let facts = sample_facts();
        let expander = Expander::with_capacity(&facts, 12);

        match expander.expand_value("abc-$(hostname)-$(os.version)") {
            Err(CoreError::ExpansionOverflow { capacity, partial }) => {
                assert_eq!(capacity, 12);
                assert_eq!(partial, "abc-myhost-");
            }
            other => panic!("expected overflow, got {other:?}"),
        }
    }

    #[test]
    fn overflow_triggers_when_capacity_is_reached() {
        let facts = sample_facts();
        // Eight bytes of output need a capacity of at least nine.
        assert!(matches!(
            Expander::with_capacity(&facts, 8).expand_value("$(hostname)-x"),
            Err(CoreError::ExpansionOverflow { partial, .. }) if partial == "myhost"
        ));
        assert_eq!(
            Expander::with_capacity(&facts, 9)
                .expand_value("$(hostname)-x")
                .expect("fits"),
            "myhost-x"
        );
    }

    #[test]
    fn overflow_on_first_literal_has_empty_prefix() {
        let facts = sample_facts();
        let long = "x".repeat(DEFAULT_EXPANSION_CAPACITY);
        assert!(matches!(
            Expander::new(&facts).expand_value(&long),
            Err(CoreError::ExpansionOverflow { partial, .. }) if partial.is_empty()
        ));
    }

    // -- provider behaviour ---------------------------------------------------

    #[derive(Default)]
    struct CountingFacts {
        inner: Option<StaticFacts>,
        network_calls: AtomicUsize,
    }

    impl FactProvider for CountingFacts {
        fn os_info(&self) -> Result<OsInfo, CoreError> {
            match &self.inner {
                Some(facts) => facts.os_info(),
                None => Err(CoreError::Facts("uname failed".into())),
            }
        }

        fn network(&self) -> Result<NetworkFacts, CoreError> {
            self.network_calls.fetch_add(1, Ordering::SeqCst);
            match &self.inner {
                Some(facts) => facts.network(),
                None => Err(CoreError::Facts("no interfaces".into())),
            }
        }

        fn utc_offset_seconds(&self) -> Result<i32, CoreError> {
            Err(CoreError::Facts("no tz".into()))
        }
    }

    #[test]
    fn provider_failure_falls_back_to_token_name() {
        let facts = CountingFacts::default();
        let out = Expander::new(&facts)
            .expand_value("$(hostname)/$(ipv4.primary)/$(timezone)")
            .expect("expand");
        assert_eq!(out, "hostname/ipv4.primary/timezone");
    }

    #[test]
    fn network_is_queried_once_per_call() {
        let facts = CountingFacts {
            inner: Some(sample_facts()),
            ..CountingFacts::default()
        };
        let expander = Expander::new(&facts);

        let out = expander
            .expand_value("$(ipv4.primary) $(ipv4.others) $(mac.primary) $(mac.others)")
            .expect("expand");
        assert_eq!(out, "10.0.0.1 10.0.0.2 02:00:00:00:00:01 02:00:00:00:00:02");
        assert_eq!(facts.network_calls.load(Ordering::SeqCst), 1);

        expander.expand_value("$(ipv6.primary)").expect("expand");
        assert_eq!(facts.network_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn works_through_trait_object() {
        let facts = sample_facts();
        let provider: &dyn FactProvider = &facts;
        assert_eq!(
            Expander::new(provider).expand_value("$(hostname)").expect("expand"),
            "myhost"
        );
    }
}
