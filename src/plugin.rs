//! Loader plugins.
//!
//! A plugin knows how to fetch one kind of asset. The [`Loader`] invokes it at
//! most once per asset id, handing it the asset's display name, the asset's
//! [`Observer`] and the [`Resolver`] of the sub-task driving the load.

use crate::{ Loader, Observer, Resolver };



/// A loader function for one kind of asset.
///
/// Implementations must consume `done` exactly once, synchronously or later,
/// optionally with an error. Before doing so they may [`track`]( Observer::track )
/// further sub-tasks on `observer`; the asset then completes only once those
/// resolve as well.
///
/// The `loader` argument gives access to the configuration
/// ([`Loader::context`], [`Loader::packages`]) and allows loading further
/// assets from within the plugin.
///
/// Closures can be registered directly through
/// [`LoaderConfig::with_plugin_fn`]( crate::LoaderConfig::with_plugin_fn ).
///
/// # Example
///
/// ```
/// use load_once::{ Loader, Observer, Plugin, Resolver };
///
/// struct Style ;
///
/// impl Plugin for Style {
///     fn load( &self, _loader: &Loader, name: &str, _observer: &Observer, done: Resolver ) {
///         println!( "applying ./style/{}.css", name );
///         done.done();
///     }
/// }
/// ```
pub trait Plugin<Ctx = ()> {
	/// Starts loading the asset called `name`.
	fn load( &self, loader: &Loader<Ctx>, name: &str, observer: &Observer, done: Resolver );
}

/// Adapter registering a closure as a [`Plugin`].
pub(crate) struct FnPlugin<F>( pub(crate) F );

impl<Ctx, F> Plugin<Ctx> for FnPlugin<F>
where
	F: Fn( &Loader<Ctx>, &str, &Observer, Resolver ),
{
	fn load( &self, loader: &Loader<Ctx>, name: &str, observer: &Observer, done: Resolver ) {
		( self.0 )( loader, name, observer, done )
	}
}
