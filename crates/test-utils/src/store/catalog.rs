use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use vercre_exchange::SupportedCredential;

#[derive(Default, Clone, Debug)]
pub struct CatalogStore {
    supported: Arc<Mutex<HashMap<String, SupportedCredential>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        let json = include_bytes!("supported.json");
        let degree: SupportedCredential = serde_json::from_slice(json).expect("should deserialize");

        Self {
            supported: Arc::new(Mutex::new(HashMap::from([(degree.identifier.clone(), degree)]))),
        }
    }

    pub fn get(&self, supported_cred_id: &str) -> Result<Option<SupportedCredential>> {
        Ok(self.supported.lock().expect("should lock").get(supported_cred_id).cloned())
    }

    pub fn list(&self) -> Result<Vec<SupportedCredential>> {
        let supported = self.supported.lock().expect("should lock");
        let mut list: Vec<SupportedCredential> = supported.values().cloned().collect();
        list.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(list)
    }

    #[allow(clippy::unnecessary_wraps)]
    pub fn add(&self, supported: &SupportedCredential) -> Result<()> {
        self.supported
            .lock()
            .expect("should lock")
            .insert(supported.identifier.clone(), supported.clone());
        Ok(())
    }

    #[allow(clippy::unnecessary_wraps)]
    pub fn remove(&self, supported_cred_id: &str) -> Result<Option<SupportedCredential>> {
        Ok(self.supported.lock().expect("should lock").remove(supported_cred_id))
    }
}
