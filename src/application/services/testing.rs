//! Scripted vendor gateway shared by the application service tests.

use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{Price, ProductKey, Timestamp, VendorId};
use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use crate::infrastructure::vendors::traits::VendorGateway;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted answer.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Quote { price: f64, stock: u32, age: Duration },
    NotFound,
    Fail,
    Hang,
}

impl Step {
    pub(crate) fn quote(price: f64, stock: u32) -> Self {
        Self::Quote {
            price,
            stock,
            age: Duration::ZERO,
        }
    }

    pub(crate) fn stale_quote(price: f64, stock: u32, age: Duration) -> Self {
        Self::Quote { price, stock, age }
    }
}

/// Gateway answering from a script, then from a fallback step.
#[derive(Debug)]
pub(crate) struct ScriptedGateway {
    vendor_id: VendorId,
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub(crate) fn new(vendor: &str, fallback: Step) -> Self {
        Self {
            vendor_id: VendorId::new(vendor),
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_script(self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.script.lock().extend(steps);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VendorGateway for ScriptedGateway {
    fn vendor_id(&self) -> &VendorId {
        &self.vendor_id
    }

    async fn fetch(&self, key: &ProductKey) -> VendorResult<Option<Quote>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match step {
            Step::Quote { price, stock, age } => {
                let price = Price::new(price).map_err(|e| VendorError::protocol(e.to_string()))?;
                Ok(Some(Quote::new(
                    self.vendor_id.clone(),
                    key.clone(),
                    price,
                    stock,
                    Timestamp::now() - age,
                )))
            }
            Step::NotFound => Ok(None),
            Step::Fail => Err(VendorError::upstream(503, "scripted failure")),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}
