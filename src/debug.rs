use crate::cost::PairCost;
#[cfg(feature = "debug")]
use serde_json::json;

#[cfg(feature = "debug")]
thread_local!(
    static TUNING_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

/// Records one scored pair into the tuning frame.
#[allow(unused)]
pub(crate) fn record_pair_cost(cost: &PairCost) {
    #[cfg(feature = "debug")]
    TUNING_FRAME.with(|frame| {
        frame.borrow_mut().push(json!({
            "total": cost.total,
            "components": cost.components.as_deref(),
        }))
    })
}

/// Takes the cost records accumulated since the last call, as a JSON array.
#[cfg(feature = "debug")]
pub fn take_tuning_frame() -> serde_json::Value {
    json!(TUNING_FRAME.with(|frame| frame.take()))
}
