use thiserror::Error ;

use crate::Observer ;
use crate::loader::ConfigError ;



/// Failure reported by a tracked sub-task.
///
/// Task errors never interrupt completion: the sub-task still counts as
/// resolved and the error travels to the observer's error handler (and from
/// there to the [`Loader`]( crate::Loader )'s error sink).
#[derive( Error, Debug )]
pub enum TaskError {
	/// The asset could not be loaded.
	#[error( "Failed to load asset: {0}" )] Failed( String ),
	/// The `packages` plugin was asked for a package that isn't configured.
	#[error( "Unknown package: {0}" )] UnknownPackage( String ),
	/// A dependent load was rejected by the loader's configuration.
	#[error( "Configuration error: {0}" )] Config( #[from] ConfigError ),
	/// Any other error raised by a plugin.
	#[error( transparent )] Other( Box<dyn std::error::Error> ),
}

impl TaskError {
	/// Convenience constructor for [`TaskError::Failed`].
	pub fn failed( reason: impl Into<String> ) -> Self { Self::Failed( reason.into() ) }

	/// Wraps an arbitrary plugin error.
	pub fn other( error: impl std::error::Error + 'static ) -> Self { Self::Other( Box::new( error )) }
}

/// The one-shot continuation handed to every tracked action.
///
/// A resolver is minted for each call to [`Observer::track`] and consumed by
/// resolving it, so a sub-task can be resolved at most once and the observer's
/// pending count can never underflow.
///
/// Dropping a resolver without resolving it leaves the observer pending
/// forever. That is a bug in the tracked action and is logged as an error.
#[must_use = "a tracked sub-task only completes once its resolver is resolved"]
pub struct Resolver {
	observer: Observer,
	resolved: bool,
}

impl Resolver {

	pub(crate) fn new( observer: Observer ) -> Self {
		Self { observer, resolved: false }
	}

	/// Resolves the sub-task, reporting `Err` through the observer's error handler.
	///
	/// # Panics
	/// Panics if this was the last pending sub-task and no
	/// [`LocalSet`]( tokio::task::LocalSet ) is running to release the waiters on.
	/// The same holds for [`Resolver::done`] and [`Resolver::fail`].
	pub fn resolve( mut self, result: Result<(), TaskError> ) {
		self.resolved = true ;
		self.observer.settle( result );
	}

	/// Resolves the sub-task successfully.
	#[inline] pub fn done( self ) { self.resolve( Ok(()) ) }

	/// Resolves the sub-task with an error.
	#[inline] pub fn fail( self, error: impl Into<TaskError> ) { self.resolve( Err( error.into() )) }

	/// The observer this sub-task is tracked on.
	#[inline] pub fn observer( &self ) -> &Observer { &self.observer }

}

impl Drop for Resolver {
	fn drop( &mut self ) {
		if !self.resolved {
			log::error!(
				"Sub-task of '{}' dropped without resolving; it will never complete",
				self.observer.label(),
			);
		}
	}
}

impl std::fmt::Debug for Resolver {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Resolver" )
			.field( "observer", &self.observer.label() )
			.field( "resolved", &self.resolved )
			.finish()
	}
}
