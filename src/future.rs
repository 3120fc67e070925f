use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

use auto_impl::auto_impl;
use tracing::warn;

use crate::error::{Error, Result, eyre};
use crate::protocol::Response;
use crate::resultset::ResultSet;

/// Completion callback for one in-flight request, held by the dispatch
/// layer next to the stream id. Must be invoked exactly once, with the
/// decoded response or with the transport error that ended the request.
///
/// An unexpected response kind fails the paired future with a protocol
/// violation; deciding whether the connection it came from is still
/// usable is the session layer's call.
#[auto_impl(Box, Arc)]
pub trait ResponseCallback: Send {
    /// The response frame for this request arrived and was decoded.
    fn on_response(&self, response: Response);

    /// The transport failed before any response arrived.
    fn on_transport_error(&self, cause: std::io::Error);
}

/// Single-assignment slot shared by one future/sink pair.
///
/// The outcome is written whole under the lock and `done` never resets,
/// so a reader observes either nothing or the final, fully built value.
struct Inner {
    done: bool,
    outcome: Option<Result<ResultSet>>,
    waker: Option<Waker>,
}

struct Shared {
    state: Mutex<Inner>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, outcome: Result<ResultSet>) {
        let mut inner = self.lock();
        if inner.done {
            warn!("response delivered twice, keeping the first outcome");
            return;
        }
        inner.done = true;
        inner.outcome = Some(outcome);
        let waker = inner.waker.take();
        drop(inner);
        self.ready.notify_all();
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

fn take_outcome(inner: &mut Inner) -> Result<ResultSet> {
    match inner.outcome.take() {
        Some(outcome) => outcome,
        // only reachable by re-polling after Ready
        None => Err(Error::BadUsageError(
            "query future already consumed".to_owned(),
        )),
    }
}

/// The caller's handle on one in-flight query.
///
/// Completed exactly once by the paired [`ResponseSink`]. Read it by
/// blocking with [`wait`](Self::wait) or
/// [`wait_timeout`](Self::wait_timeout), or by `.await`ing it.
pub struct QueryFuture {
    shared: Arc<Shared>,
}

impl QueryFuture {
    /// Create the linked future/sink pair for one request. The sink
    /// goes to the dispatch layer, the future to the caller.
    pub fn pair() -> (QueryFuture, ResponseSink) {
        let shared = Arc::new(Shared {
            state: Mutex::new(Inner {
                done: false,
                outcome: None,
                waker: None,
            }),
            ready: Condvar::new(),
        });
        let sink = ResponseSink {
            shared: Arc::clone(&shared),
        };
        (QueryFuture { shared }, sink)
    }

    /// Block until the response arrives, then yield it.
    pub fn wait(self) -> Result<ResultSet> {
        let mut inner = self.shared.lock();
        loop {
            if inner.done {
                return take_outcome(&mut inner);
            }
            inner = self
                .shared
                .ready
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until the response arrives or `timeout` elapses.
    ///
    /// Timing out consumes the future; a response that arrives later is
    /// dropped, the same as abandoning the request. A `timeout` the clock
    /// cannot represent waits unbounded instead.
    pub fn wait_timeout(self, timeout: Duration) -> Result<ResultSet> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait();
        };
        let mut inner = self.shared.lock();
        loop {
            if inner.done {
                return take_outcome(&mut inner);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::WaitTimeout(timeout));
            }
            let (guard, _) = self
                .shared
                .ready
                .wait_timeout(inner, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
        }
    }
}

impl Future for QueryFuture {
    type Output = Result<ResultSet>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.shared.lock();
        if inner.done {
            return Poll::Ready(take_outcome(&mut inner));
        }
        match &inner.waker {
            Some(waker) if waker.will_wake(cx.waker()) => {}
            _ => inner.waker = Some(cx.waker().clone()),
        }
        Poll::Pending
    }
}

/// Producer half of [`QueryFuture::pair`], owned by the dispatch layer.
pub struct ResponseSink {
    shared: Arc<Shared>,
}

impl ResponseCallback for ResponseSink {
    fn on_response(&self, response: Response) {
        match response {
            Response::Result(result) => self.shared.complete(ResultSet::from_response(result)),
            Response::Error(payload) => self.shared.complete(Err(payload.into())),
            other => {
                warn!(kind = other.kind(), "unexpected response to a query");
                self.shared.complete(Err(Error::ProtocolViolation(eyre!(
                    "unexpected {} response to a query",
                    other.kind()
                ))));
            }
        }
    }

    fn on_transport_error(&self, cause: std::io::Error) {
        self.shared.complete(Err(cause.into()));
    }
}

/// A sink dropped without completing fails the future, so an abandoned
/// request can never strand its waiter.
impl Drop for ResponseSink {
    fn drop(&mut self) {
        let pending = !self.shared.lock().done;
        if pending {
            self.shared.complete(Err(Error::TransportFailure(
                std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "request dropped before a response was delivered",
                ),
            )));
        }
    }
}
