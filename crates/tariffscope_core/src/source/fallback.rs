use std::fmt;
use std::future::Future;

/// Every link of a fallback chain failed
#[derive(Debug)]
pub struct FallbackError<E> {
    /// (link, error) in the order the links were tried
    pub attempts: Vec<(String, E)>,
}

/// Try `attempt` on each link in order and return the first success with its index.
///
/// Links are tried sequentially; the list order is the priority order.
pub async fn try_in_order<'a, S, T, E, F, Fut>(
    links: &'a [S],
    mut attempt: F,
) -> Result<(usize, T), FallbackError<E>>
where
    S: fmt::Display,
    E: fmt::Display,
    F: FnMut(&'a S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = Vec::with_capacity(links.len());
    for (idx, link) in links.iter().enumerate() {
        match attempt(link).await {
            Ok(value) => return Ok((idx, value)),
            Err(err) => {
                tracing::warn!(candidate = %link, error = %err, "fallback candidate failed");
                attempts.push((link.to_string(), err));
            }
        }
    }
    Err(FallbackError { attempts })
}
