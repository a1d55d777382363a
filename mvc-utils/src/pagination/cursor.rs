//! Pure page-index state machine behind the paginator controls.

/// Page counts at or above this switch first/last from boundary jumps to relative jumps.
pub const JUMP_POLICY_MIN_PAGES: usize = 15;
/// Distance covered by first/last under the jump policy.
pub const JUMP_DISTANCE: usize = 10;

/// Navigation control attached to a paginated message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavControl {
    First,
    Previous,
    /// Display-only page indicator.
    Indicator,
    Next,
    Last,
}

impl NavControl {
    /// Controls in the order they are rendered.
    pub const ALL: [NavControl; 5] = [
        NavControl::First,
        NavControl::Previous,
        NavControl::Indicator,
        NavControl::Next,
        NavControl::Last,
    ];

    /// Stable name used inside component custom IDs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Previous => "prev",
            Self::Indicator => "page",
            Self::Next => "next",
            Self::Last => "last",
        }
    }

    /// Parse a name produced by [`NavControl::as_str`].
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|control| control.as_str() == raw)
    }
}

/// One-based position within a fixed number of pages.
///
/// `1 <= current <= total` holds for every value this type hands out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    current: usize,
    total: usize,
}

impl PageCursor {
    /// Start at `target_page`, or at page 1 when the target is outside `[1, total]`.
    ///
    /// A `total` of zero is treated as a single page.
    pub fn new(total: usize, target_page: i64) -> Self {
        let total = total.max(1);
        let current = usize::try_from(target_page)
            .ok()
            .filter(|page| (1..=total).contains(page))
            .unwrap_or(1);

        Self { current, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether first/last use relative jumps instead of snapping to the boundary.
    pub fn uses_jump_policy(&self) -> bool {
        self.total >= JUMP_POLICY_MIN_PAGES
    }

    /// Page indicator label, e.g. `3/20`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.current, self.total)
    }

    /// Apply `control` and return the new page. The indicator is a no-op.
    pub fn apply(&mut self, control: NavControl) -> usize {
        match control {
            NavControl::First => self.first(),
            NavControl::Previous => self.previous(),
            NavControl::Indicator => self.current,
            NavControl::Next => self.next(),
            NavControl::Last => self.last(),
        }
    }

    pub fn first(&mut self) -> usize {
        if !self.uses_jump_policy() {
            self.current = 1;
            return self.current;
        }

        // (P - 10) mod N without leaving unsigned arithmetic.
        let mut page = (self.current + self.total - JUMP_DISTANCE % self.total) % self.total;
        if page < 1 {
            page = self.total;
        }
        // Unreachable after the branch above.
        if page == 0 {
            page = 1;
        }

        self.current = page;
        self.current
    }

    pub fn previous(&mut self) -> usize {
        self.current = if self.current <= 1 {
            self.total
        } else {
            self.current - 1
        };
        self.current
    }

    pub fn next(&mut self) -> usize {
        self.current = if self.current >= self.total {
            1
        } else {
            self.current + 1
        };
        self.current
    }

    pub fn last(&mut self) -> usize {
        if !self.uses_jump_policy() {
            self.current = self.total;
            return self.current;
        }

        let mut page = (self.current + JUMP_DISTANCE) % self.total;
        // Unreachable: a remainder is always below N.
        if page > self.total {
            page = 1;
        }
        if page == 0 {
            page = self.total;
        }

        self.current = page;
        self.current
    }
}
