//! The asset registry.
//!
//! A [`Loader`] maps plugin names to [`Plugin`]s and every requested
//! `( plugin, id )` pair to the [`Observer`] tracking its load. The observer is
//! created on the first request and reused for every request after it, so each
//! plugin runs at most once per asset id no matter how many callers ask for it.

use std::cell::RefCell ;
use std::collections::HashMap ;
use std::future::Future ;
use std::rc::{ Rc, Weak };
use pipe_trait::Pipe ;
use thiserror::Error ;

use crate::{ LoaderConfig, Observer, Plugin, Packages, PackagesPlugin, PACKAGES_PLUGIN, TaskError };
use crate::observer::ErrorHandler ;



/// Errors caused by how the loader was configured.
///
/// Raised synchronously by [`Loader::load`] and friends. These indicate a
/// caller bug and are not retried.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum ConfigError {
	/// No plugin is registered under the requested name.
	#[error( "Plugin for '{0}' not in config" )] UnknownPlugin( String ),
}

/// Progress of an asset that has been requested at least once.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum AssetState {
	/// Some of the asset's sub-tasks are still in flight.
	Pending,
	/// Every sub-task resolved. Errors, if any, went to the error sink.
	Complete,
}

impl std::fmt::Display for AssetState {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

struct LoaderInner<Ctx> {
	plugins: HashMap<String, Rc<dyn Plugin<Ctx>>>,
	packages: Packages,
	context: Ctx,
	/// `plugin → id → observer`; entries are never replaced or removed.
	assets: RefCell<HashMap<String, HashMap<String, Observer>>>,
	onerror: RefCell<Option<ErrorHandler>>,
}

/// Loads each asset once and tells every interested caller when it's done.
///
/// `Loader` is a handle type: cloning it creates another reference to the same
/// registry. Plugins receive it so they can read the configuration and load
/// further assets.
///
/// Everything runs on a single thread. Completion callbacks are scheduled with
/// [`tokio::task::spawn_local`], so loads must be driven from within a
/// [`LocalSet`]( tokio::task::LocalSet ).
///
/// # Errors
///
/// Errors reported by plugins never reach the load callbacks. They are all
/// funneled into the sink set with [`Loader::set_onerror`], whichever asset
/// they came from.
pub struct Loader<Ctx = ()> {
	inner: Rc<LoaderInner<Ctx>>,
}

impl<Ctx> Clone for Loader<Ctx> {
	fn clone( &self ) -> Self { Self { inner: Rc::clone( &self.inner )}}
}

impl<Ctx: 'static> Loader<Ctx> {

	/// Builds a loader from `config`, layering its plugins over the defaults.
	pub fn new( config: LoaderConfig<Ctx> ) -> Self {

		let mut plugins: HashMap<String, Rc<dyn Plugin<Ctx>>> = HashMap::from([
			( PACKAGES_PLUGIN.to_string(), Rc::new( PackagesPlugin ) as Rc<dyn Plugin<Ctx>> ),
		]);
		plugins.extend( config.plugins );

		LoaderInner {
			plugins,
			packages: config.packages,
			context: config.context,
			assets: RefCell::new( HashMap::new() ),
			onerror: RefCell::new( None ),
		}.pipe( Rc::new ).pipe(| inner | Self { inner })

	}

	/// The user context from the configuration.
	#[inline] pub fn context( &self ) -> &Ctx { &self.inner.context }

	/// The package manifests from the configuration.
	#[inline] pub fn packages( &self ) -> &Packages { &self.inner.packages }

	/// Whether a plugin is registered under `name`.
	pub fn has_plugin( &self, name: &str ) -> bool { self.inner.plugins.contains_key( name ) }

	/// Sets the sink receiving every error reported by any asset.
	pub fn set_onerror( &self, handler: impl Fn( TaskError ) + 'static ) {
		*self.inner.onerror.borrow_mut() = Some( Rc::new( handler ));
	}

	/// Removes the error sink. Errors reported afterwards are only logged.
	pub fn clear_onerror( &self ) {
		*self.inner.onerror.borrow_mut() = None ;
	}

	/// Requests the asset `id` from `plugin` and runs `callback` once it has loaded.
	///
	/// The asset's display name, passed to the plugin, is `id` itself; see
	/// [`Loader::load_named`] to choose another one.
	///
	/// # Errors
	/// Returns [`ConfigError::UnknownPlugin`] if no plugin is registered as `plugin`.
	///
	/// # Panics
	/// Panics if the asset is already complete, or the plugin resolves it right
	/// away, while no [`LocalSet`]( tokio::task::LocalSet ) is running.
	pub fn load(
		&self,
		plugin: &str,
		id: &str,
		callback: impl FnOnce() + 'static,
	) -> Result<&Self, ConfigError> {
		self.observe( plugin, id, None )?.notify( callback );
		Ok( self )
	}

	/// Same as [`Loader::load`] but passes `name` to the plugin instead of `id`.
	///
	/// The name only matters for the request that first creates the asset;
	/// later requests for the same id reuse the running load.
	///
	/// # Errors
	/// Returns [`ConfigError::UnknownPlugin`] if no plugin is registered as `plugin`.
	///
	/// # Panics
	/// Same as [`Loader::load`].
	pub fn load_named(
		&self,
		plugin: &str,
		id: &str,
		name: &str,
		callback: impl FnOnce() + 'static,
	) -> Result<&Self, ConfigError> {
		self.observe( plugin, id, Some( name ))?.notify( callback );
		Ok( self )
	}

	/// Requests the asset and returns a future resolving once it has loaded.
	///
	/// # Errors
	/// Returns [`ConfigError::UnknownPlugin`] if no plugin is registered as `plugin`.
	///
	/// # Panics
	/// Same as [`Loader::load`].
	pub fn load_future( &self, plugin: &str, id: &str ) -> Result<impl Future<Output = ()> + 'static, ConfigError> {
		Ok( self.observe( plugin, id, None )?.completed() )
	}

	/// Returns the observer of `( plugin, id )`, starting the load if this is
	/// the first request for it.
	///
	/// The new observer is registered before the plugin runs, so a plugin asking
	/// for its own asset again gets the same observer back.
	///
	/// # Errors
	/// Returns [`ConfigError::UnknownPlugin`] if no plugin is registered as `plugin`.
	pub fn observe( &self, plugin: &str, id: &str, name: Option<&str> ) -> Result<Observer, ConfigError> {

		let plugin_fn = self.inner.plugins.get( plugin )
			.cloned()
			.ok_or_else(|| ConfigError::UnknownPlugin( plugin.to_string() ))?;

		if let Some( observer ) = self.lookup( plugin, id ) {
			log::trace!( "Reusing '{}:{}'", plugin, id );
			return Ok( observer );
		}

		let observer = Observer::labelled( format!( "{}:{}", plugin, id ));
		observer.set_error_handler( self.error_route( observer.label() ));
		self.inner.assets.borrow_mut()
			.entry( plugin.to_string() ).or_default()
			.insert( id.to_string(), observer.clone() );

		let name = name.unwrap_or( id );
		log::debug!( "Loading '{}:{}' as '{}'", plugin, id, name );

		let loader = self.clone();
		observer.track(| done | plugin_fn.load( &loader, name, &observer, done ));

		Ok( observer )

	}

	/// Progress of `( plugin, id )`, or `None` if it was never requested.
	pub fn state( &self, plugin: &str, id: &str ) -> Option<AssetState> {
		self.lookup( plugin, id ).map(| observer | match observer.is_complete() {
			true => AssetState::Complete,
			false => AssetState::Pending,
		})
	}

	fn lookup( &self, plugin: &str, id: &str ) -> Option<Observer> {
		self.inner.assets.borrow().get( plugin ).and_then(| assets | assets.get( id )).cloned()
	}

	/// Routes an observer's errors into this loader's sink without keeping the loader alive.
	fn error_route( &self, label: String ) -> ErrorHandler {
		let inner: Weak<LoaderInner<Ctx>> = Rc::downgrade( &self.inner );
		Rc::new( move | error: TaskError | {
			log::error!( "Failed to load '{}': {}", label, error );
			if let Some( inner ) = inner.upgrade() { inner.report( error ) }
		})
	}

}

impl<Ctx> LoaderInner<Ctx> {
	fn report( &self, error: TaskError ) {
		// Cloned out so the sink may call back into the loader. The error was
		// already logged by the observer's route; without a sink it is dropped.
		let handler = self.onerror.borrow().clone();
		if let Some( handler ) = handler { handler( error ) }
	}
}

impl<Ctx: std::fmt::Debug> std::fmt::Debug for Loader<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Loader" )
			.field( "plugins", &self.inner.plugins.keys().collect::<Vec<_>>() )
			.field( "packages", &self.inner.packages )
			.field( "context", &self.inner.context )
			.field( "assets", &self.inner.assets.borrow() )
			.field( "onerror", &self.inner.onerror.borrow().as_ref().map(| _ | "<handler>" ))
			.finish()
	}
}
