use std::sync::{Arc, Mutex};

use autostream_core::CompletedLead;

/// Terminal side effect of the funnel. Invoked exactly once per completed lead
/// and has no error path.
pub trait LeadCapture: Send + Sync {
    fn name(&self) -> &'static str;
    fn capture(&self, lead: &CompletedLead);
}

#[derive(Clone, Default)]
pub struct InMemoryLeadCapture {
    leads: Arc<Mutex<Vec<CompletedLead>>>,
}

impl InMemoryLeadCapture {
    pub fn leads(&self) -> Vec<CompletedLead> {
        match self.leads.lock() {
            Ok(leads) => leads.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.leads().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LeadCapture for InMemoryLeadCapture {
    fn name(&self) -> &'static str {
        "in_memory_lead_capture"
    }

    fn capture(&self, lead: &CompletedLead) {
        match self.leads.lock() {
            Ok(mut leads) => leads.push(lead.clone()),
            Err(poisoned) => poisoned.into_inner().push(lead.clone()),
        }
    }
}
