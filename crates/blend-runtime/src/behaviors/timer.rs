//! Timer behavior

use super::{Behavior, BehaviorCore, action_list, attach_actions, run_triggered};
use crate::registry::JsonObject;
use crate::runtime::Runtime;
use crate::scheduler::TimerId;
use crate::value::{Map, Value};
use blend_dom::NodeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) const TIMER: &str = "Blend.Behaviors.TimerBehavior";

const DEFAULT_TOTAL_TICKS: f64 = 10.0;
const DEFAULT_MILLISECONDS_PER_TICK: f64 = 1000.0;

#[derive(Debug, Clone, Copy)]
struct TickState {
    timer: TimerId,
    count: u64,
}

/// Runs its triggered actions on a repeating timer
///
/// Each attachment gets its own interval and tick counter. The interval
/// is cleared right after the tick that reaches `totalTicks`; an
/// infinite `totalTicks` ticks until detached.
#[derive(Debug)]
pub struct TimerBehavior {
    core: BehaviorCore,
    total_ticks: f64,
    milliseconds_per_tick: f64,
    triggered_actions: Vec<Value>,
    ticks: RefCell<HashMap<NodeId, TickState>>,
    extras: Map,
}

impl Default for TimerBehavior {
    fn default() -> Self {
        Self {
            core: BehaviorCore::default(),
            total_ticks: DEFAULT_TOTAL_TICKS,
            milliseconds_per_tick: DEFAULT_MILLISECONDS_PER_TICK,
            triggered_actions: Vec::new(),
            ticks: RefCell::new(HashMap::new()),
            extras: Map::new(),
        }
    }
}

impl TimerBehavior {
    pub fn total_ticks(&self) -> f64 {
        self.total_ticks
    }

    pub fn milliseconds_per_tick(&self) -> f64 {
        self.milliseconds_per_tick
    }

    /// Interval period in whole milliseconds, at least 1
    fn period_ms(&self) -> u64 {
        if self.milliseconds_per_tick.is_finite() && self.milliseconds_per_tick >= 1.0 {
            self.milliseconds_per_tick as u64
        } else {
            1
        }
    }

    /// Ticks run so far for `element`, if its timer is live
    pub fn tick_count(&self, element: NodeId) -> Option<u64> {
        self.ticks.borrow().get(&element).map(|s| s.count)
    }

    fn tick(&self, rt: &mut Runtime, element: NodeId) {
        let (run, last) = {
            let mut ticks = self.ticks.borrow_mut();
            let Some(state) = ticks.get_mut(&element) else {
                return;
            };
            if self.total_ticks == f64::INFINITY {
                (true, false)
            } else if (state.count as f64) < self.total_ticks {
                state.count += 1;
                (true, state.count as f64 >= self.total_ticks)
            } else {
                (false, true)
            }
        };

        if run {
            run_triggered(rt, &self.triggered_actions, element, &[]);
        }
        if last {
            self.stop(rt, element);
        }
    }

    fn stop(&self, rt: &mut Runtime, element: NodeId) {
        let state = self.ticks.borrow_mut().remove(&element);
        if let Some(state) = state {
            tracing::trace!("Stopping timer for element {} after {} ticks", element, state.count);
            rt.clear_timer(state.timer);
        }
    }
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl JsonObject for TimerBehavior {
    fn type_name(&self) -> &'static str {
        TIMER
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "totalTicks" => {
                if let Some(n) = number_value(&value) {
                    self.total_ticks = n;
                }
            }
            "millisecondsPerTick" => {
                if let Some(n) = number_value(&value) {
                    self.milliseconds_per_tick = n;
                }
            }
            "triggeredActions" => self.triggered_actions = action_list(value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "totalTicks" => Value::Number(self.total_ticks),
            "millisecondsPerTick" => Value::Number(self.milliseconds_per_tick),
            "triggeredActions" => Value::Array(self.triggered_actions.clone()),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Behavior for TimerBehavior {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn attach_impl(self: Rc<Self>, rt: &mut Runtime, element: NodeId) {
        attach_actions(rt, &self.triggered_actions, element);
        if self.ticks.borrow().contains_key(&element) {
            return;
        }
        let behavior = Rc::clone(&self);
        let timer = rt.set_interval(
            Rc::new(move |rt: &mut Runtime| behavior.tick(rt, element)),
            self.period_ms(),
        );
        self.ticks
            .borrow_mut()
            .insert(element, TickState { timer, count: 0 });
    }

    fn detach_impl(&self, rt: &mut Runtime, element: NodeId) {
        self.stop(rt, element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_properties() {
        let mut timer = TimerBehavior::default();
        assert_eq!(timer.property("totalTicks"), Value::Number(10.0));
        assert_eq!(timer.period_ms(), 1000);

        timer.set_property("totalTicks", Value::from("4"));
        timer.set_property("millisecondsPerTick", Value::Number(0.25));
        assert_eq!(timer.total_ticks(), 4.0);
        assert_eq!(timer.period_ms(), 1);

        timer.set_property("totalTicks", Value::Number(f64::INFINITY));
        assert_eq!(timer.property("totalTicks"), Value::Number(f64::INFINITY));
    }
}
