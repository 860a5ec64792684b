//! Stop-word filtering
//!
//! Combines the German list from the `stop-words` crate with a curated list of
//! campaign vocabulary (hashtags, constituency names, event words) that would
//! otherwise dominate every topic.

use std::collections::HashSet;
use stop_words::{get, LANGUAGE};

/// Campaign terms from the 2021 Hessian Bundestag posts that carry no topic.
pub const CAMPAIGN_STOP_WORDS: &[&str] = &[
    "mein", "klaren", "degen", "innen", "inner", "https", "vorab", "link", "solch", "insbesondere",
    "spdbergstrasse", "ederseestehen", "bundestag", "bundestagswahl", "bundestagsabgeordneter",
    "teamherkules", "zusammenmachen", "wegenmorgen", "guterplan", "btw21", "cdukassel",
    "erststimmeaufenager", "werrameissnerkreis", "starkeheimat", "fürunsindenbundestag",
    "fürdeutschland", "klarelinie", "lahndillkreis", "teamirmer", "irmerstimme",
    "findeneinrichtungen", "johannesunterwegs", "19uhr", "stimme", "erststimme", "zweitstimme",
    "allesistdrin", "youtu", "youtube", "bereitweilihresseid", "wahlkampf", "wahl", "wählen",
    "mitherzdabei", "echtesther", "bundestagsabgeordnete", "missionzuversicht",
    "sozialpolitikfürdich", "erststimmeistfrankestimme", "bundesmitteln",
    "döringwählenunterstützen", "scholzpacktdasan", "landkreislimburgweilburg", "teamalicia",
    "infostand", "natalie2021", "spdruedesheim", "erststimmenadine", "rufnachberlin",
    "ausrespektvordeinerzukunft", "driljakristinseewald", "wahlkreis", "ausrespekt",
    "heusenstammerschloss", "svenwingerter", "veranstaltung", "info", "thema", "erststimmecdu",
    "stefanheck", "obertorstrasse", "wahlkreisabgeordneten", "btw2021diskussionsrunde",
    "silberbachhalle", "samstag", "maintaunusbraun", "wahlkreis184trebur", "wahlprogramm",
    "unserestimmeimbundestag", "kw187team", "beid", "gespräch", "btw2021alisha", "kandidat",
    "bereiten", "wahlinfostand", "moderieren", "demnächstkanzlerolafscholz",
    "bundestagsabgeordneten", "pdfaktuelle", "hauptstadtinfos", "sozialepolitikfürdich", "grüne",
    "diegrünen", "hälftedermachtdenfrauen", "vonbensheimindenbundestag", "zudem", "mdbartol",
    "gestern", "stunden", "sonntag", "politikchristian", "stefansauermdb", "teamcdu",
    "natürlichnordhessen", "dernächstekanzlerolafscholz", "döring21", "michaelaufenager",
    "cduidda", "cdufriedberg", "wahlkampftour", "kalender", "uhrzeit", "dieschmidt", "themen",
    "bundestagskandidatin", "zusammenzukunftgestalten", "abgeordnet", "wahlzettel",
    "direktmandat", "bundestagswahl2021", "eurezukunfteurewahl", "2021",
];

/// Case-insensitive stop-word set
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
}

impl StopwordFilter {
    /// German defaults plus the campaign list
    pub fn german() -> Self {
        let mut filter = Self::empty();
        filter.stopwords = get(LANGUAGE::German).iter().map(|s| s.to_lowercase()).collect();
        filter.add_stopwords(CAMPAIGN_STOP_WORDS);
        filter
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_list(words: &[&str]) -> Self {
        let mut filter = Self::empty();
        filter.add_stopwords(words);
        filter
    }

    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
