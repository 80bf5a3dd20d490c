use itertools::Itertools;
use std::borrow::Cow;

/// Shortens view titles built from file names or paths.
/// Leading path components are dropped first; the tail is always kept.
pub struct TitleAbbreviator<'a> {
    delimiter: &'a str,
    max_len: usize,
    stub: &'a str,
}

impl<'a> TitleAbbreviator<'a> {
    /// Create new abbreviator.
    ///
    /// # Arguments
    ///
    /// * `delimiter`: path components delimiter
    /// * `stub`: prefix of an abbreviated title
    /// * `max_len`: maximum title length in chars
    pub fn new(delimiter: &'a str, stub: &'a str, max_len: usize) -> Self {
        Self {
            delimiter,
            max_len,
            stub,
        }
    }

    /// Get a title for `name`, abbreviated if it is longer than the limit.
    pub fn apply<'b>(&self, name: &'b str) -> Cow<'b, str> {
        if name.chars().count() <= self.max_len {
            return Cow::Borrowed(name);
        }

        let parts = name.split(self.delimiter).collect_vec();
        let budget = self.max_len.saturating_sub(self.stub.chars().count());

        let mut used = 0;
        let tail_cnt = parts
            .iter()
            .rev()
            .take_while(|part| {
                used += part.chars().count() + self.delimiter.len();
                used <= budget
            })
            .count();

        if tail_cnt == 0 {
            // a single component is too long, cut it from the left
            let last = parts.last().copied().unwrap_or(name);
            let keep = budget.min(last.chars().count());
            let skip = last.chars().count() - keep;
            let tail: String = last.chars().skip(skip).collect();
            return Cow::Owned(format!("{}{tail}", self.stub));
        }

        let start_from = parts.len() - tail_cnt;
        let tail = parts.into_iter().skip(start_from).join(self.delimiter);
        Cow::Owned(format!("{}{}{tail}", self.stub, self.delimiter))
    }
}
