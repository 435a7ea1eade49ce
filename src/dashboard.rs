//! Dashboard state: the selected stock, the watchlist and search results.
//!
//! All mutation goes through the methods here. Each effective change is
//! broadcast as a [`StateChange`] so a view can redraw on demand.

use crate::catalog::Catalog;
use crate::error::DashboardError;
use crate::models::{PricePoint, StockRecord};
use crate::prediction::Prediction;
use crate::search;
use crate::simulator::{Jitter, PriceSimulator};
use crate::watchlist::Watchlist;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Instant;
use tokio::sync::broadcast;

/// Number of stocks pinned to the watchlist at startup.
pub const INITIAL_WATCHLIST_LEN: usize = 3;

/// Default number of price points kept for the chart.
pub const DEFAULT_HISTORY_LEN: usize = 60;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Which part of the state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Selection,
    Watchlist,
    SearchResults,
}

/// State holder for one dashboard session.
pub struct Dashboard<J: Jitter> {
    catalog: Catalog,
    selection: StockRecord,
    watchlist: Watchlist,
    query: String,
    search_results: Vec<StockRecord>,
    history: VecDeque<PricePoint>,
    history_len: usize,
    simulator: PriceSimulator<J>,
    last_tick: Option<DateTime<Utc>>,
    changes: broadcast::Sender<StateChange>,
}

impl<J: Jitter> Dashboard<J> {
    /// Start a session over `catalog` and schedule the first simulator tick.
    pub fn new(catalog: Catalog, jitter: J, history_len: usize) -> Result<Self, DashboardError> {
        let selection = catalog.first().cloned().ok_or(DashboardError::EmptyCatalog)?;
        let watchlist =
            Watchlist::from_entries(catalog.records().iter().take(INITIAL_WATCHLIST_LEN).cloned());
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        let mut simulator = PriceSimulator::new(jitter);
        simulator.start(Instant::now());

        let mut dashboard = Self {
            catalog,
            selection,
            watchlist,
            query: String::new(),
            search_results: Vec::new(),
            history: VecDeque::new(),
            history_len: history_len.max(1),
            simulator,
            last_tick: None,
            changes,
        };
        dashboard.reset_history();
        Ok(dashboard)
    }

    /// Receive a message for every subsequent state change.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    fn notify(&self, change: StateChange) {
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }

    /// Make `stock` the selection exactly as given.
    pub fn select(&mut self, stock: StockRecord) {
        self.selection = stock;
        self.reset_history();
        self.notify(StateChange::Selection);
    }

    /// Select the catalog entry for `symbol`. Returns `false` if there is none.
    pub fn select_symbol(&mut self, symbol: &str) -> bool {
        match self.catalog.find(symbol).cloned() {
            Some(stock) => {
                self.select(stock);
                true
            }
            None => false,
        }
    }

    /// Recompute the search results for `query`.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.search_results = search::search(&self.catalog, query);
        self.notify(StateChange::SearchResults);
    }

    /// Pin `stock` unless its symbol is already on the watchlist.
    pub fn add_to_watchlist(&mut self, stock: StockRecord) -> bool {
        let added = self.watchlist.add(stock);
        if added {
            self.notify(StateChange::Watchlist);
        }
        added
    }

    /// Pin the catalog entry for `symbol`. Returns `false` if unknown or already pinned.
    pub fn add_symbol(&mut self, symbol: &str) -> bool {
        match self.catalog.find(symbol).cloned() {
            Some(stock) => self.add_to_watchlist(stock),
            None => false,
        }
    }

    /// Apply one simulator step to the selection right away.
    ///
    /// Does nothing once the simulator has been stopped.
    pub fn tick(&mut self) -> bool {
        if !self.simulator.is_running() {
            return false;
        }
        self.selection = self.simulator.step(&self.selection);
        let now = Utc::now();
        self.last_tick = Some(now);
        self.record(now);
        self.notify(StateChange::Selection);
        true
    }

    /// Apply a simulator step if one is due at `now`.
    pub fn advance(&mut self, now: Instant) -> bool {
        self.simulator.poll(now) && self.tick()
    }

    /// Cancel the simulator permanently. Later `tick` and `advance` calls are no-ops.
    pub fn stop(&mut self) {
        self.simulator.stop();
    }

    pub fn is_simulating(&self) -> bool {
        self.simulator.is_running()
    }

    pub fn simulator(&self) -> &PriceSimulator<J> {
        &self.simulator
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &StockRecord {
        &self.selection
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_results(&self) -> &[StockRecord] {
        &self.search_results
    }

    pub fn history(&self) -> &VecDeque<PricePoint> {
        &self.history
    }

    pub fn last_tick(&self) -> Option<DateTime<Utc>> {
        self.last_tick
    }

    pub fn prediction(&self) -> Prediction {
        Prediction::from_price(self.selection.current_price)
    }

    pub fn is_selected(&self, symbol: &str) -> bool {
        self.selection.symbol == symbol
    }

    pub fn in_watchlist(&self, symbol: &str) -> bool {
        self.watchlist.contains(symbol)
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.record(Utc::now());
    }

    fn record(&mut self, at: DateTime<Utc>) {
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(PricePoint {
            at,
            price: self.selection.current_price,
        });
    }
}

impl<J: Jitter> Drop for Dashboard<J> {
    fn drop(&mut self) {
        self.simulator.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::TICK_PERIOD;
    use crate::simulator::tests::ScriptedJitter;
    use tokio::sync::broadcast::error::TryRecvError;

    fn scenario_catalog() -> Catalog {
        Catalog::new(vec![
            StockRecord::new("AAPL", "Apple Inc.", 150.0, 1.0),
            StockRecord::new("GOOG", "Alphabet Inc.", 2800.0, -4.0),
            StockRecord::new("MSFT", "Microsoft Corporation", 300.0, 0.5),
            StockRecord::new("NVDA", "NVIDIA Corporation", 495.0, 12.0),
        ])
        .unwrap()
    }

    fn dashboard(samples: &[f64]) -> Dashboard<ScriptedJitter> {
        Dashboard::new(scenario_catalog(), ScriptedJitter::new(samples), 5).unwrap()
    }

    fn watch_symbols<J: Jitter>(d: &Dashboard<J>) -> Vec<String> {
        d.watchlist().iter().map(|s| s.symbol.clone()).collect()
    }

    #[test]
    fn test_initial_state() {
        let d = dashboard(&[0.0]);
        assert_eq!(d.selection().symbol, "AAPL");
        assert_eq!(watch_symbols(&d), vec!["AAPL", "GOOG", "MSFT"]);
        assert!(d.search_results().is_empty());
        assert_eq!(d.query(), "");
        assert_eq!(d.history().len(), 1);
        assert!(d.is_simulating());
        assert!(d.last_tick().is_none());
    }

    #[test]
    fn test_empty_catalog_fails_startup() {
        let result = Dashboard::new(
            Catalog::new(Vec::new()).unwrap(),
            ScriptedJitter::new(&[0.0]),
            DEFAULT_HISTORY_LEN,
        );
        assert!(matches!(result, Err(DashboardError::EmptyCatalog)));
    }

    #[test]
    fn test_small_catalog_watchlist() {
        let catalog = Catalog::new(vec![StockRecord::new("ONE", "Only One", 1.0, 0.0)]).unwrap();
        let d = Dashboard::new(catalog, ScriptedJitter::new(&[0.0]), 5).unwrap();
        assert_eq!(watch_symbols(&d), vec!["ONE"]);
    }

    #[test]
    fn test_scenario_search_select_add_existing() {
        let mut d = dashboard(&[0.0]);
        d.search("goo");
        assert_eq!(d.search_results().len(), 1);
        let goog = d.search_results()[0].clone();
        assert_eq!(goog.symbol, "GOOG");

        d.select(goog.clone());
        assert_eq!(d.selection(), &goog);

        let before = watch_symbols(&d);
        assert!(!d.add_to_watchlist(goog));
        assert_eq!(watch_symbols(&d), before);
    }

    #[test]
    fn test_scenario_add_new_stock_appends() {
        let mut d = dashboard(&[0.0]);
        let tesla = StockRecord::new("TSLA", "Tesla", 700.0, 5.0);
        assert!(d.add_to_watchlist(tesla.clone()));
        assert_eq!(d.watchlist().len(), 4);
        assert_eq!(d.watchlist().entries().last(), Some(&tesla));
    }

    #[test]
    fn test_select_replaces_exactly() {
        let mut d = dashboard(&[0.0]);
        let mut custom = StockRecord::new("XYZ", "Not In Catalog", 12.34, -0.5);
        custom.volume = 99;
        d.select(custom.clone());
        assert_eq!(d.selection(), &custom);
    }

    #[test]
    fn test_tick_preserves_symbol() {
        let mut d = dashboard(&[0.9, -0.7, -0.3, 0.4]);
        d.select_symbol("MSFT");
        for _ in 0..25 {
            d.tick();
            assert_eq!(d.selection().symbol, "MSFT");
            assert_eq!(d.selection().name, "Microsoft Corporation");
        }
        assert!(d.last_tick().is_some());
    }

    #[test]
    fn test_tick_formula_on_selection() {
        let mut d = dashboard(&[0.5, -1.0]);
        d.tick();
        assert_eq!(d.selection().current_price, 151.0);
        assert_eq!(d.selection().change, 0.5);
        // Catalog keeps the original values.
        assert_eq!(d.catalog().find("AAPL").unwrap().current_price, 150.0);
    }

    #[test]
    fn test_ticks_after_select_continue_from_new_stock() {
        let mut d = dashboard(&[0.5, 0.0]);
        d.tick();
        d.select_symbol("GOOG");
        d.tick();
        assert_eq!(d.selection().symbol, "GOOG");
        assert_eq!(d.selection().current_price, 2801.0);
        assert_eq!(d.selection().change, -4.0);
    }

    #[test]
    fn test_advance_respects_schedule_and_stop() {
        let mut d = dashboard(&[0.5, 0.0]);
        let now = Instant::now();
        assert!(!d.advance(now));
        assert!(d.advance(now + TICK_PERIOD * 2));
        assert_eq!(d.selection().current_price, 151.0);

        d.stop();
        assert!(!d.is_simulating());
        assert!(!d.advance(now + TICK_PERIOD * 100));
        assert_eq!(d.selection().current_price, 151.0);
    }

    #[test]
    fn test_tick_after_stop_is_ignored() {
        let mut d = dashboard(&[0.5, 0.0]);
        let mut rx = d.subscribe();
        d.stop();

        assert!(!d.tick());
        assert_eq!(d.selection().current_price, 150.0);
        assert_eq!(d.selection().change, 1.0);
        assert!(d.last_tick().is_none());
        assert_eq!(d.history().len(), 1);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_select_and_add_by_symbol() {
        let mut d = dashboard(&[0.0]);
        assert!(d.select_symbol("nvda"));
        assert!(d.is_selected("NVDA"));
        assert!(!d.select_symbol("NOPE"));
        assert!(d.is_selected("NVDA"));

        assert!(d.add_symbol("NVDA"));
        assert!(!d.add_symbol("NVDA"));
        assert!(!d.add_symbol("NOPE"));
        assert_eq!(watch_symbols(&d), vec!["AAPL", "GOOG", "MSFT", "NVDA"]);
    }

    #[test]
    fn test_empty_search_clears_results() {
        let mut d = dashboard(&[0.0]);
        d.search("a");
        assert!(!d.search_results().is_empty());
        d.search("");
        assert!(d.search_results().is_empty());
    }

    #[test]
    fn test_history_resets_on_select_and_is_bounded() {
        let mut d = dashboard(&[0.1, 0.1]);
        for _ in 0..10 {
            d.tick();
        }
        assert_eq!(d.history().len(), 5);
        let last = d.history().back().unwrap();
        assert_eq!(last.price, d.selection().current_price);

        d.select_symbol("GOOG");
        assert_eq!(d.history().len(), 1);
        assert_eq!(d.history()[0].price, 2800.0);
    }

    #[test]
    fn test_prediction_follows_selection() {
        let mut d = dashboard(&[0.0]);
        d.select(StockRecord::new("HUND", "Hundred", 100.0, 0.0));
        let p = d.prediction();
        assert_eq!(p.day_display(), "102.30");
        assert_eq!(p.week_display(), "108.70");
    }

    #[test]
    fn test_change_notifications() {
        let mut d = dashboard(&[0.0]);
        let mut rx = d.subscribe();

        d.search("goo");
        assert_eq!(rx.try_recv(), Ok(StateChange::SearchResults));

        d.select_symbol("GOOG");
        assert_eq!(rx.try_recv(), Ok(StateChange::Selection));

        assert!(!d.add_symbol("GOOG"));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        d.add_symbol("NVDA");
        assert_eq!(rx.try_recv(), Ok(StateChange::Watchlist));

        d.tick();
        assert_eq!(rx.try_recv(), Ok(StateChange::Selection));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }
}
