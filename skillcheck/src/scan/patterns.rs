//! Line patterns for the Go anti-pattern scanner.

use std::sync::LazyLock;

use regex::Regex;

use super::AntiPattern;

/// Interfaces with more methods than this are reported.
pub const MAX_INTERFACE_METHODS: usize = 5;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("valid pattern ", stringify!($name))));
    };
}

pattern!(
    GLOBAL_STATE,
    r"^var\s+\w+\s+(\*(sql|gorm)\.DB|\*http\.Client|\*redis\.Client|sync\.(RW)?Mutex|map\[)"
);
pattern!(INIT_FUNC, r"^func\s+init\s*\(\s*\)");
pattern!(
    DISCARDED_ERROR,
    r"^\s*(\w+\s*,\s*)*_\s*(:=|=)\s*[\w.]+(\[[^\]]*\])?\("
);
pattern!(PANIC_CALL, r"\bpanic\(");
pattern!(GOROUTINE, r"^\s*go\s+(func\s*\(|[\w.]+\()");
pattern!(CONTEXT_ARG, r"\bctx\b|\bcontext\.");
pattern!(INTERFACE_START, r"^\s*type\s+(\w+)\s+interface\s*\{\s*$");
pattern!(INTERFACE_METHOD, r"^\s*[A-Za-z_]\w*\s*\(");

/// Drops a trailing `//` comment. String literals are not tracked.
pub(crate) fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Single-line anti-patterns present on `line`.
pub(crate) fn match_line(line: &str) -> Vec<AntiPattern> {
    let mut found = Vec::new();
    if GLOBAL_STATE.is_match(line) {
        found.push(AntiPattern::GlobalState);
    }
    if INIT_FUNC.is_match(line) {
        found.push(AntiPattern::InitFunction);
    }
    if DISCARDED_ERROR.is_match(line) {
        found.push(AntiPattern::DiscardedError);
    }
    if PANIC_CALL.is_match(line) {
        found.push(AntiPattern::Panic);
    }
    if GOROUTINE.is_match(line) && !CONTEXT_ARG.is_match(line) {
        found.push(AntiPattern::GoroutineWithoutContext);
    }
    found
}

/// Name of the interface opened on `line`, if any.
pub(crate) fn interface_start(line: &str) -> Option<&str> {
    INTERFACE_START
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub(crate) fn is_interface_method(line: &str) -> bool {
    INTERFACE_METHOD.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<AntiPattern> {
        match_line(strip_line_comment(line))
    }

    #[test]
    fn global_state() {
        assert_eq!(kinds("var db *sql.DB"), [AntiPattern::GlobalState]);
        assert_eq!(kinds("var mu sync.RWMutex"), [AntiPattern::GlobalState]);
        assert_eq!(kinds("var cache map[string]int"), [AntiPattern::GlobalState]);
        assert!(kinds("var version = \"1.0\"").is_empty());
        assert!(kinds("\tvar db *sql.DB").is_empty());
    }

    #[test]
    fn init_function() {
        assert_eq!(kinds("func init() {"), [AntiPattern::InitFunction]);
        assert!(kinds("func initServer() {").is_empty());
    }

    #[test]
    fn discarded_error() {
        assert_eq!(kinds("\t_ = os.Remove(path)"), [AntiPattern::DiscardedError]);
        assert_eq!(kinds("\tdata, _ := io.ReadAll(r)"), [AntiPattern::DiscardedError]);
        assert!(kinds("\tfor _, v := range items {").is_empty());
        assert!(kinds("\tdata, err := io.ReadAll(r)").is_empty());
    }

    #[test]
    fn panic_call() {
        assert_eq!(kinds("\tpanic(err)"), [AntiPattern::Panic]);
        assert!(kinds("\t// panic(err)").is_empty());
        assert!(kinds("\tdontpanic(err)").is_empty());
    }

    #[test]
    fn goroutines() {
        assert_eq!(kinds("\tgo func() {"), [AntiPattern::GoroutineWithoutContext]);
        assert_eq!(kinds("\tgo worker(jobs)"), [AntiPattern::GoroutineWithoutContext]);
        assert!(kinds("\tgo worker(ctx, jobs)").is_empty());
        assert!(kinds("\tgo func(c context.Context) {").is_empty());
    }

    #[test]
    fn interface_lines() {
        assert_eq!(interface_start("type Store interface {"), Some("Store"));
        assert_eq!(interface_start("type Store interface{}"), None);
        assert!(is_interface_method("\tGet(ctx context.Context, id string) (*User, error)"));
        assert!(!is_interface_method("\tio.Reader"));
    }
}
