use super::events::StallEvent;
use super::types::{Day, Money, Seconds};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

/// One money movement, tagged with the day it happened on.
/// Records are append-only; aggregation happens at rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub amount: Money,
    pub kind: TransactionKind,
    pub timestamp: Seconds,
    pub day: Day,
}

/// Permanent product of one day's rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: Day,
    pub total_income: Money,
    pub customers_served: u64,
    pub good_review_rate: f64,
}

/// Per-day transaction aggregation, history series, and the day
/// counter. Days advance only through `rollup_day`.
pub struct TransactionLedger {
    records: Vec<TransactionRecord>,
    summaries: Vec<DaySummary>,
    current_day: Day,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            summaries: Vec::new(),
            current_day: 1,
        }
    }

    pub fn current_day(&self) -> Day {
        self.current_day
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn summaries(&self) -> &[DaySummary] {
        &self.summaries
    }

    pub fn record_income(&mut self, amount: Money, now: Seconds) {
        self.push_record(amount, TransactionKind::Income, now);
    }

    pub fn record_expense(&mut self, amount: Money, now: Seconds) {
        self.push_record(amount, TransactionKind::Expense, now);
    }

    /// Event-driven entry point: the ledger consumes payment events
    /// routed to it by the engine before the bus dispatches them.
    pub fn handle_event(&mut self, event: &StallEvent, now: Seconds) {
        if let StallEvent::CustomerPaid { amount, .. } = event {
            self.record_income(*amount, now);
        }
    }

    /// Close the current day: aggregate its income records together
    /// with the tallies handed in by the engine, store the permanent
    /// summary, and advance the day counter.
    pub fn rollup_day(
        &mut self,
        customers_served: u64,
        good_review_rate: f64,
        now: Seconds,
    ) -> (DaySummary, StallEvent) {
        let closing_day = self.current_day;
        let total_income: Money = self
            .records
            .iter()
            .filter(|r| r.day == closing_day && r.kind == TransactionKind::Income)
            .map(|r| r.amount)
            .sum();

        let summary = DaySummary {
            day: closing_day,
            total_income,
            customers_served,
            good_review_rate,
        };
        self.summaries.push(summary.clone());
        self.current_day += 1;
        info!(
            "[TransactionLedger] Day {} closed at {:.0}s: {} gold, {} served",
            closing_day, now, total_income, customers_served
        );

        let event = StallEvent::DayAdvanced {
            day: self.current_day,
            summary: summary.clone(),
        };
        (summary, event)
    }

    /// Total income per day across all recorded transactions. Pure and
    /// idempotent; feeds downstream charting.
    pub fn history_by_day(&self) -> BTreeMap<Day, Money> {
        let mut history = BTreeMap::new();
        for record in &self.records {
            if record.kind == TransactionKind::Income {
                *history.entry(record.day).or_insert(0) += record.amount;
            }
        }
        history
    }

    fn push_record(&mut self, amount: Money, kind: TransactionKind, now: Seconds) {
        debug!(
            "[TransactionLedger] Day {} {:?}: {}",
            self.current_day, kind, amount
        );
        self.records.push(TransactionRecord {
            id: Uuid::new_v4().to_string(),
            amount,
            kind,
            timestamp: now,
            day: self.current_day,
        });
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}
