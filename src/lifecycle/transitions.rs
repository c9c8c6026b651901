//! Per-entity status transition tables.
//!
//! Every lifecycle in the system is driven from here: a service first asks
//! the table whether (current status, actor, next status) is permitted and
//! only then touches the database. Handlers expose the same rows so a
//! client can render exactly the actions the caller may invoke.

use crate::models::ordermodel::OrderStatus;
use crate::models::reviewmodel::ModerationStatus;
use crate::models::supportmodel::TicketStatus;

/// Which side of an order the acting user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderActor {
    Client,
    Executor,
}

/// How the action should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Primary,
    Secondary,
    Destructive,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct OrderTransition {
    pub next: OrderStatus,
    pub label: &'static str,
    pub emphasis: Emphasis,
    /// Destructive transitions demand a non-empty reason; the revision
    /// request collects one but does not require it.
    pub requires_reason: bool,
}

const fn primary(next: OrderStatus, label: &'static str) -> OrderTransition {
    OrderTransition { next, label, emphasis: Emphasis::Primary, requires_reason: false }
}

const fn secondary(next: OrderStatus, label: &'static str) -> OrderTransition {
    OrderTransition { next, label, emphasis: Emphasis::Secondary, requires_reason: false }
}

const fn destructive(next: OrderStatus, label: &'static str) -> OrderTransition {
    OrderTransition { next, label, emphasis: Emphasis::Destructive, requires_reason: true }
}

const NONE: &[OrderTransition] = &[];

const PENDING_EXECUTOR: &[OrderTransition] = &[
    primary(OrderStatus::Accepted, "Accept order"),
    destructive(OrderStatus::Cancelled, "Reject"),
];
const ACCEPTED_EXECUTOR: &[OrderTransition] = &[primary(OrderStatus::InProgress, "Start work")];
const ACCEPTED_CLIENT: &[OrderTransition] = &[destructive(OrderStatus::Cancelled, "Cancel order")];
const IN_PROGRESS_EXECUTOR: &[OrderTransition] =
    &[primary(OrderStatus::Review, "Submit for review")];
const REVIEW_CLIENT: &[OrderTransition] = &[
    primary(OrderStatus::Completed, "Accept work"),
    secondary(OrderStatus::Revision, "Request changes"),
];
const REVISION_EXECUTOR: &[OrderTransition] = &[primary(OrderStatus::Review, "Resubmit")];

/// The full order state machine, one row per (status, actor) pair.
pub fn available_order_transitions(
    status: OrderStatus,
    actor: OrderActor,
) -> &'static [OrderTransition] {
    use OrderActor::*;
    use OrderStatus::*;

    match (status, actor) {
        (Pending, Executor) => PENDING_EXECUTOR,
        (Pending, Client) => NONE,

        (Accepted, Executor) => ACCEPTED_EXECUTOR,
        (Accepted, Client) => ACCEPTED_CLIENT,

        (InProgress, Executor) => IN_PROGRESS_EXECUTOR,
        (InProgress, Client) => NONE,

        (Review, Client) => REVIEW_CLIENT,
        (Review, Executor) => NONE,

        (Revision, Executor) => REVISION_EXECUTOR,
        (Revision, Client) => NONE,

        (Completed, _) | (Cancelled, _) => NONE,
    }
}

/// Look up a single permitted transition, or None when the table forbids it.
pub fn order_transition(
    status: OrderStatus,
    actor: OrderActor,
    next: OrderStatus,
) -> Option<&'static OrderTransition> {
    available_order_transitions(status, actor)
        .iter()
        .find(|t| t.next == next)
}

/// Ticket lifecycle. Tickets used to be mutated through a free-form status
/// selector; they now go through an explicit table like every other entity.
pub fn available_ticket_transitions(status: TicketStatus) -> &'static [TicketStatus] {
    use TicketStatus::*;
    match status {
        Open => &[InProgress, Resolved, Closed],
        InProgress => &[Resolved, Closed],
        Resolved => &[Closed],
        Closed => &[],
    }
}

pub fn ticket_transition_allowed(current: TicketStatus, next: TicketStatus) -> bool {
    available_ticket_transitions(current).contains(&next)
}

/// Reviews have exactly one non-terminal state.
pub fn review_transition_allowed(current: ModerationStatus, next: ModerationStatus) -> bool {
    current == ModerationStatus::Pending
        && matches!(next, ModerationStatus::Approved | ModerationStatus::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderActor::*;
    use OrderStatus::*;

    fn nexts(status: OrderStatus, actor: OrderActor) -> Vec<OrderStatus> {
        available_order_transitions(status, actor)
            .iter()
            .map(|t| t.next)
            .collect()
    }

    #[test]
    fn pending_order_sides() {
        assert_eq!(nexts(Pending, Executor), vec![Accepted, Cancelled]);
        assert!(nexts(Pending, Client).is_empty());
    }

    #[test]
    fn accepted_order_sides() {
        assert_eq!(nexts(Accepted, Executor), vec![InProgress]);
        assert_eq!(nexts(Accepted, Client), vec![Cancelled]);
    }

    #[test]
    fn in_progress_only_executor_moves() {
        assert_eq!(nexts(InProgress, Executor), vec![Review]);
        assert!(nexts(InProgress, Client).is_empty());
    }

    #[test]
    fn review_only_client_moves() {
        assert_eq!(nexts(Review, Client), vec![Completed, Revision]);
        assert!(nexts(Review, Executor).is_empty());
    }

    #[test]
    fn revision_resubmit() {
        assert_eq!(nexts(Revision, Executor), vec![Review]);
        assert!(nexts(Revision, Client).is_empty());
    }

    #[test]
    fn table_rows_outlive_the_lookup() {
        let rows: Vec<&'static [OrderTransition]> =
            [Pending, Accepted, InProgress, Review, Revision, Completed, Cancelled]
                .into_iter()
                .flat_map(|s| {
                    [
                        available_order_transitions(s, Client),
                        available_order_transitions(s, Executor),
                    ]
                })
                .collect();

        let total: usize = rows.iter().map(|row| row.len()).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn terminal_orders_have_no_transitions() {
        for status in [Completed, Cancelled] {
            for actor in [Client, Executor] {
                assert!(nexts(status, actor).is_empty(), "{:?}/{:?}", status, actor);
            }
        }
    }

    #[test]
    fn destructive_transitions_require_reason() {
        let reject = order_transition(Pending, Executor, Cancelled).unwrap();
        assert_eq!(reject.emphasis, Emphasis::Destructive);
        assert!(reject.requires_reason);

        let cancel = order_transition(Accepted, Client, Cancelled).unwrap();
        assert!(cancel.requires_reason);

        // Requesting changes collects a reason but never requires one.
        let revision = order_transition(Review, Client, Revision).unwrap();
        assert_eq!(revision.emphasis, Emphasis::Secondary);
        assert!(!revision.requires_reason);
    }

    #[test]
    fn forbidden_order_lookup_is_none() {
        assert!(order_transition(Pending, Client, Cancelled).is_none());
        assert!(order_transition(Review, Executor, Completed).is_none());
        assert!(order_transition(Completed, Client, Review).is_none());
    }

    #[test]
    fn ticket_table() {
        use TicketStatus::*;
        assert_eq!(available_ticket_transitions(Open), &[InProgress, Resolved, Closed]);
        assert_eq!(available_ticket_transitions(InProgress), &[Resolved, Closed]);
        assert_eq!(available_ticket_transitions(Resolved), &[Closed]);
        assert!(available_ticket_transitions(Closed).is_empty());

        assert!(ticket_transition_allowed(Open, Resolved));
        assert!(!ticket_transition_allowed(Resolved, Open));
        assert!(!ticket_transition_allowed(Open, Open));
    }

    #[test]
    fn review_states_are_terminal() {
        use ModerationStatus::*;
        assert!(review_transition_allowed(Pending, Approved));
        assert!(review_transition_allowed(Pending, Rejected));
        assert!(!review_transition_allowed(Approved, Rejected));
        assert!(!review_transition_allowed(Rejected, Approved));
        assert!(!review_transition_allowed(Pending, Pending));
    }
}
