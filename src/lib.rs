//! A load-once asset orchestrator.
//!
//! Assets (scripts, stylesheets, templates, or anything a plugin knows how to
//! fetch) are identified by a plugin name and an id. The [`Loader`] runs the
//! plugin for each distinct `( plugin, id )` pair exactly once, however many
//! callers ask for it, and tells every one of them when the asset is done.
//!
//! # Core Concepts
//!
//! - [`Observer`]: Tracks the sub-tasks of one asset. Each sub-task is
//! 	registered with [`Observer::track`] and resolved through the [`Resolver`]
//! 	it receives. Once all of them resolve, every callback queued with
//! 	[`Observer::notify`] fires, exactly once.
//!
//! - [`Plugin`]: A loader function for one kind of asset. It receives the asset's
//! 	name, its observer and the resolver of the sub-task driving the load, and
//! 	may track further sub-tasks before resolving.
//!
//! - [`Loader`]: The registry. Maps plugin names to plugins and assets to their
//! 	observers, and funnels every error into a single sink.
//!
//! - **Packages**: The built-in [`PACKAGES_PLUGIN`] loads every asset listed in a
//! 	[`PackageManifest`] and completes once all of them have.
//!
//! # Scheduling
//!
//! Everything runs on one thread. Completion callbacks are never invoked on
//! the turn that triggers them; they are deferred with
//! [`tokio::task::spawn_local`], so the loader must be driven from within a
//! [`tokio::task::LocalSet`]. Because of this, every sub-task a plugin tracks
//! synchronously is counted before any of them can complete the asset.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell ;
//! use std::rc::Rc ;
//! use load_once::{ Loader, LoaderConfig, PackageManifest };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = tokio::runtime::Builder::new_current_thread().build()?;
//! let local = tokio::task::LocalSet::new();
//!
//! local.block_on( &runtime, async {
//!
//! 	let requested = Rc::new( RefCell::new( Vec::new() ));
//!
//! 	// Plugins usually hand off to real I/O and resolve later; this one
//! 	// just records what it was asked for.
//! 	let seen = Rc::clone( &requested );
//! 	let config = LoaderConfig::default()
//! 		.with_plugin_fn( "js", move | _loader, name, _observer, done | {
//! 			seen.borrow_mut().push( name.to_string() );
//! 			done.done();
//! 		})
//! 		.with_package( "app", PackageManifest::new().with( "js", [ "one", "two" ]));
//!
//! 	let loader = Loader::new( config );
//! 	loader.set_onerror(| err | eprintln!( "asset failed: {}", err ));
//!
//! 	// The package and the direct request share "one"; it is only loaded once.
//! 	let app = loader.load_future( "packages", "app" )?;
//! 	let one = loader.load_future( "js", "one" )?;
//! 	app.await ;
//! 	one.await ;
//!
//! 	assert_eq!( *requested.borrow(), [ "one", "two" ]);
//! 	Ok::<_, load_once::ConfigError>(())
//!
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Requesting an asset from a plugin that isn't registered fails immediately
//! with a [`ConfigError`]. Everything that goes wrong while loading is a
//! [`TaskError`]: it is reported to the loader's error sink (see
//! [`Loader::set_onerror`]) and never prevents completion. Load callbacks
//! receive no arguments, so check the sink to learn whether anything failed.

mod config ;
mod loader ;
mod observer ;
mod package ;
mod plugin ;
mod resolver ;
mod scheduler ;

pub use config::LoaderConfig ;
pub use loader::{ Loader, AssetState, ConfigError };
pub use observer::{ Observer, ErrorHandler };
pub use package::{ PackageManifest, Packages, PackagesPlugin, ManifestError, PACKAGES_PLUGIN };
pub use plugin::Plugin ;
pub use resolver::{ Resolver, TaskError };
