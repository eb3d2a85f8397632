/// External stop rule, called with the number of the generation about to be
/// computed (starting at 1).
///
/// `Some(false)` continues the run; `Some(true)` stops it, and so does `None`,
/// which stands for a predicate with nothing to say.
pub type TerminationPredicate = Box<dyn FnMut(usize) -> Option<bool>>;

/// Whether the run ends before computing `generation`.
///
/// With a predicate installed it alone decides; otherwise the run stops once
/// `maxiter` generations have been computed.
pub(crate) fn should_stop(
    predicate: Option<&mut TerminationPredicate>,
    generation: usize,
    maxiter: usize,
) -> bool {
    match predicate {
        Some(pred) => (*pred)(generation).unwrap_or(true),
        None => generation > maxiter,
    }
}
