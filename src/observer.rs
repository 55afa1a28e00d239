//! Completion tracking for one unit of asynchronous work.
//!
//! An [`Observer`] counts the sub-tasks registered through [`Observer::track`]
//! and releases everything queued through [`Observer::notify`] once the last of
//! them resolves. Sub-task errors are forwarded to an error handler as they
//! happen; they never stop the observer from completing.

use std::cell::RefCell ;
use std::future::Future ;
use std::rc::Rc ;
use tokio::sync::oneshot ;

use crate::scheduler ;
use crate::{ Resolver, TaskError };



/// Shared handler receiving every error reported to an [`Observer`].
pub type ErrorHandler = Rc<dyn Fn( TaskError )>;

type Waiter = Box<dyn FnOnce()>;

struct ObserverState {
	label: String,
	pending: usize,
	complete: bool,
	waiting: Vec<Waiter>,
	onerror: Option<ErrorHandler>,
}

/// Tracks a dynamic set of in-flight sub-tasks and fires its waiters once all
/// of them have resolved.
///
/// `Observer` is a handle type: cloning it creates another reference to the
/// same underlying state, which lets plugins keep the observer around while
/// they finish their work asynchronously.
///
/// An observer that never tracks anything never completes.
///
/// # Example
///
/// ```
/// use std::cell::Cell ;
/// use std::rc::Rc ;
/// use load_once::Observer ;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(
/// # tokio::task::LocalSet::new().run_until( async {
/// let observer = Observer::new();
/// let fired = Rc::new( Cell::new( false ));
///
/// observer.track(| done | done.done() );
/// observer.notify({ let fired = Rc::clone( &fired ); move || fired.set( true ) });
///
/// // Waiters never run on the turn that completes the observer.
/// assert!( observer.is_complete() );
/// assert!( !fired.get() );
///
/// observer.completed().await ;
/// assert!( fired.get() );
/// # }));
/// ```
#[derive( Clone )]
pub struct Observer {
	state: Rc<RefCell<ObserverState>>,
}

impl Default for Observer {
	fn default() -> Self { Self::new() }
}

impl Observer {

	/// Creates an observer with no tracked sub-tasks.
	pub fn new() -> Self { Self::labelled( "observer" ) }

	pub(crate) fn labelled( label: impl Into<String> ) -> Self {
		Self { state: Rc::new( RefCell::new( ObserverState {
			label: label.into(),
			pending: 0,
			complete: false,
			waiting: Vec::new(),
			onerror: None,
		}))}
	}

	/// Name used when this observer shows up in log records.
	pub fn label( &self ) -> String { self.state.borrow().label.clone() }

	/// Number of sub-tasks tracked but not yet resolved.
	pub fn pending( &self ) -> usize { self.state.borrow().pending }

	/// Whether every tracked sub-task has resolved.
	pub fn is_complete( &self ) -> bool { self.state.borrow().complete }

	/// Sets the handler receiving sub-task errors, replacing any previous one.
	pub fn set_onerror( &self, handler: impl Fn( TaskError ) + 'static ) {
		self.set_error_handler( Rc::new( handler ));
	}

	pub(crate) fn set_error_handler( &self, handler: ErrorHandler ) {
		self.state.borrow_mut().onerror = Some( handler );
	}

	/// Removes the error handler. Errors reported afterwards are only logged.
	pub fn clear_onerror( &self ) {
		self.state.borrow_mut().onerror = None ;
	}

	/// Tracks one sub-task.
	///
	/// The pending count is incremented before `action` runs, and `action` is
	/// invoked synchronously with the [`Resolver`] it must eventually consume.
	/// Every sub-task tracked on the current turn is therefore counted before
	/// any of them can complete the observer.
	///
	/// Tracking on an observer that has already completed is allowed but logged:
	/// the pending count goes up again while [`Observer::is_complete`] stays true.
	pub fn track( &self, action: impl FnOnce( Resolver )) {
		{
			let mut state = self.state.borrow_mut();
			if state.complete {
				log::warn!( "Tracking a sub-task on '{}' after it already completed", state.label );
			}
			state.pending += 1 ;
		}
		action( Resolver::new( self.clone() ));
	}

	/// Tracks a future as one sub-task, running it on the local executor.
	///
	/// # Panics
	/// Panics if called outside of a [`LocalSet`]( tokio::task::LocalSet ).
	pub fn track_future( &self, future: impl Future<Output = Result<(), TaskError>> + 'static ) {
		self.track(| done | scheduler::spawn( async move { done.resolve( future.await ) }));
	}

	/// Queues `callback` to run once this observer completes.
	///
	/// Callbacks queued before completion run back-to-back, in order, on the tick
	/// after the last sub-task resolves. Callbacks queued after completion run on
	/// a later tick. Either way each callback runs exactly once and never on the
	/// turn it was registered.
	///
	/// # Panics
	/// Panics if the observer is already complete and no
	/// [`LocalSet`]( tokio::task::LocalSet ) is running to defer `callback` on.
	pub fn notify( &self, callback: impl FnOnce() + 'static ) {
		let mut state = self.state.borrow_mut();
		if !state.complete {
			state.waiting.push( Box::new( callback ));
			return ;
		}
		log::trace!( "'{}' already complete, deferring late waiter", state.label );
		drop( state );
		scheduler::defer( callback );
	}

	/// Returns a future that resolves once this observer completes.
	///
	/// Never resolves if the observer never completes, including when every
	/// handle to it is dropped first.
	///
	/// # Panics
	/// Panics if the observer is already complete and no [`LocalSet`]( tokio::task::LocalSet )
	/// is running, see [`Observer::notify`].
	pub fn completed( &self ) -> impl Future<Output = ()> + 'static {
		let ( sender, receiver ) = oneshot::channel();
		self.notify( move || { let _ = sender.send(()); });
		async move {
			// The sender only goes away unsent if the observer was dropped pending.
			if receiver.await.is_err() { std::future::pending::<()>().await }
		}
	}

	pub(crate) fn settle( &self, result: Result<(), TaskError> ) {

		if let Err( error ) = result { self.report( error ) }

		let mut state = self.state.borrow_mut();
		debug_assert!( state.pending > 0, "more resolutions than tracked sub-tasks" );
		state.pending -= 1 ;

		if state.pending == 0 {
			state.complete = true ;
			log::debug!( "'{}' complete, releasing {} waiters", state.label, state.waiting.len() );
			drop( state );
			let observer = self.clone();
			scheduler::defer( move || observer.release_waiters() );
		}

	}

	fn report( &self, error: TaskError ) {
		// Cloned out so the handler may freely call back into this observer.
		let handler = self.state.borrow().onerror.clone();
		match handler {
			Some( handler ) => handler( error ),
			None => log::warn!( "Unhandled error in '{}': {}", self.label(), error ),
		}
	}

	fn release_waiters( &self ) {
		let waiting = std::mem::take( &mut self.state.borrow_mut().waiting );
		waiting.into_iter().for_each(| waiter | waiter() );
	}

}

impl std::fmt::Debug for Observer {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		let state = self.state.borrow();
		f.debug_struct( "Observer" )
			.field( "label", &state.label )
			.field( "pending", &state.pending )
			.field( "complete", &state.complete )
			.field( "waiting", &state.waiting.len() )
			.field( "onerror", &state.onerror.as_ref().map(| _ | "<handler>" ))
			.finish()
	}
}
