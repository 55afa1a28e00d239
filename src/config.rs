use std::collections::HashMap ;
use std::rc::Rc ;

use crate::{ Loader, Observer, Resolver, Plugin, PackageManifest, Packages };
use crate::plugin::FnPlugin ;



/// Configuration a [`Loader`] is built from.
///
/// Plugins registered here are layered over the built-in ones (currently only
/// [`packages`]( crate::PACKAGES_PLUGIN )); a configured plugin with the same name
/// replaces the default. The package manifests and the user `context` stay
/// reachable from every plugin through [`Loader::packages`] and [`Loader::context`].
///
/// # Type Parameters
/// - `Ctx`: Arbitrary user data made available to plugins
#[must_use = "pass the config to Loader::new"]
pub struct LoaderConfig<Ctx = ()> {
	pub(crate) plugins: HashMap<String, Rc<dyn Plugin<Ctx>>>,
	pub(crate) packages: Packages,
	pub(crate) context: Ctx,
}

impl Default for LoaderConfig<()> {
	fn default() -> Self { Self::new(()) }
}

impl<Ctx> LoaderConfig<Ctx> {

	/// Creates a configuration with no plugins of its own and no packages.
	pub fn new( context: Ctx ) -> Self {
		Self {
			plugins: HashMap::with_capacity( 0 ),
			packages: Packages::new(),
			context,
		}
	}

	/// Registers `plugin` under `name`, replacing any plugin of the same name.
	pub fn with_plugin( mut self, name: impl Into<String>, plugin: impl Plugin<Ctx> + 'static ) -> Self {
		let plugin: Rc<dyn Plugin<Ctx>> = Rc::new( plugin );
		self.plugins.insert( name.into(), plugin );
		self
	}

	/// Registers a closure as the plugin `name`.
	///
	/// ```
	/// use load_once::LoaderConfig ;
	///
	/// let config = LoaderConfig::default()
	///     .with_plugin_fn( "js", | _loader, name, _observer, done | {
	///         println!( "sourcing ./js/{}.js", name );
	///         done.done();
	///     });
	/// # let _ = config ;
	/// ```
	pub fn with_plugin_fn<F>( self, name: impl Into<String>, plugin: F ) -> Self
	where
		F: Fn( &Loader<Ctx>, &str, &Observer, Resolver ) + 'static,
		Ctx: 'static,
	{
		self.with_plugin( name, FnPlugin( plugin ))
	}

	/// Replaces the package manifests.
	pub fn with_packages( mut self, packages: Packages ) -> Self {
		self.packages = packages ;
		self
	}

	/// Adds or replaces a single package manifest.
	pub fn with_package( mut self, name: impl Into<String>, manifest: PackageManifest ) -> Self {
		self.packages.insert( name, manifest );
		self
	}

	/// The user context plugins will see.
	#[inline] pub fn context( &self ) -> &Ctx { &self.context }

	/// The configured package manifests.
	#[inline] pub fn packages( &self ) -> &Packages { &self.packages }

}

impl<Ctx: std::fmt::Debug> std::fmt::Debug for LoaderConfig<Ctx> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LoaderConfig" )
			.field( "plugins", &self.plugins.keys().collect::<Vec<_>>() )
			.field( "packages", &self.packages )
			.field( "context", &self.context )
			.finish()
	}
}
