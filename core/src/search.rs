use kbnav_protocol::SearchHit;
use kbnav_protocol::SearchOptions;
use kbnav_protocol::SearchScope;
use serde::Serialize;

/// Query state behind the search panel. Results are replaced only by a
/// successful search or an explicit clear.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub scope: SearchScope,
    pub whole_word: bool,
    pub case_sensitive: bool,
    pub use_regex: bool,
    pub results: Vec<SearchHit>,
}

impl SearchState {
    pub fn options(&self, max_results: usize) -> SearchOptions {
        SearchOptions {
            scope: self.scope,
            max_results,
            whole_word: self.whole_word,
            case_sensitive: self.case_sensitive,
            use_regex: self.use_regex,
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
    }
}
