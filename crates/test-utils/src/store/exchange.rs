use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use vercre_exchange::state::{ExchangeRecord, Filter};

#[derive(Default, Clone, Debug)]
pub struct ExchangeStore {
    records: Arc<Mutex<HashMap<String, ExchangeRecord>>>,
}

impl ExchangeStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn query(&self, filter: &Filter) -> Result<Vec<ExchangeRecord>> {
        let records = self.records.lock().expect("should lock");
        Ok(records.values().filter(|r| filter.matches(r)).cloned().collect())
    }

    pub fn get(&self, exchange_id: &str) -> Result<Option<ExchangeRecord>> {
        Ok(self.records.lock().expect("should lock").get(exchange_id).cloned())
    }

    #[allow(clippy::unnecessary_wraps)]
    pub fn put(&self, record: &ExchangeRecord) -> Result<()> {
        self.records
            .lock()
            .expect("should lock")
            .insert(record.exchange_id.clone(), record.clone());
        Ok(())
    }

    // the lock is held across the comparison and the write
    #[allow(clippy::unnecessary_wraps)]
    pub fn compare_and_swap(
        &self, current: &ExchangeRecord, updated: &ExchangeRecord,
    ) -> Result<bool> {
        let mut records = self.records.lock().expect("should lock");
        if records.get(&current.exchange_id) != Some(current) {
            return Ok(false);
        }
        records.insert(updated.exchange_id.clone(), updated.clone());
        Ok(true)
    }

    #[allow(clippy::unnecessary_wraps)]
    pub fn delete(&self, exchange_id: &str) -> Result<Option<ExchangeRecord>> {
        Ok(self.records.lock().expect("should lock").remove(exchange_id))
    }
}
