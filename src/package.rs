//! Package manifests and the built-in `packages` plugin.
//!
//! A package is a declarative list of assets, grouped by the plugin that loads
//! them. Loading the package loads every listed asset and completes once all
//! of them (and, transitively, everything they depend on) have completed.
//! Assets shared between packages are still loaded only once.
//!
//! Manifests are usually written in TOML, one table per package:
//!
//! ```toml
//! [one]
//! js = ["one", "one_dep"]
//!
//! [two]
//! packages = ["one"]
//! js = ["two"]
//! template = ["magic"]
//! style = ["magic"]
//! ```

use indexmap::IndexMap ;
use itertools::Itertools ;
use serde::Deserialize ;
use thiserror::Error ;

use crate::{ Loader, Observer, Plugin, Resolver, TaskError };



/// Name the built-in package plugin is registered under.
pub const PACKAGES_PLUGIN: &str = "packages" ;

/// Error parsing package manifests.
#[derive( Error, Debug )]
pub enum ManifestError {
	/// The manifest isn't valid TOML or doesn't have the expected shape.
	#[error( "Invalid package manifest: {0}" )] Toml( #[from] toml::de::Error ),
}

/// The assets making up one package: plugin name → asset ids.
///
/// Declaration order is preserved and is the order in which the assets are
/// requested.
#[derive( Debug, Clone, Default, PartialEq, Eq, Deserialize )]
#[serde( transparent )]
pub struct PackageManifest( IndexMap<String, Vec<String>> );

impl PackageManifest {

	/// Creates an empty manifest.
	pub fn new() -> Self { Self::default() }

	/// Appends `ids` to the assets loaded through `plugin`.
	pub fn with( mut self, plugin: impl Into<String>, ids: impl IntoIterator<Item = impl Into<String>> ) -> Self {
		self.0.entry( plugin.into() ).or_default().extend( ids.into_iter().map( Into::into ));
		self
	}

	/// Every `( plugin, id )` pair in declaration order.
	pub fn assets( &self ) -> impl Iterator<Item = ( &str, &str )> {
		self.0.iter().flat_map(|( plugin, ids )| ids.iter().map( move | id | ( plugin.as_str(), id.as_str() )))
	}

	/// Total number of assets listed.
	pub fn len( &self ) -> usize { self.0.values().map( Vec::len ).sum() }

	/// Whether the manifest lists no assets at all.
	pub fn is_empty( &self ) -> bool { self.len() == 0 }

}

impl<P, I, S> FromIterator<( P, I )> for PackageManifest
where
	P: Into<String>,
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = ( P, I )>>( iter: T ) -> Self {
		iter.into_iter().fold( Self::new(), | manifest, ( plugin, ids )| manifest.with( plugin, ids ))
	}
}

/// Named package manifests, as consumed by the `packages` plugin.
#[derive( Debug, Clone, Default, PartialEq, Eq, Deserialize )]
#[serde( transparent )]
pub struct Packages( IndexMap<String, PackageManifest> );

impl Packages {

	/// Creates an empty set of packages.
	pub fn new() -> Self { Self::default() }

	/// Parses packages from TOML, one table per package.
	///
	/// # Errors
	/// Returns [`ManifestError::Toml`] if the document isn't valid TOML or a
	/// package entry isn't an array of strings.
	pub fn from_toml_str( source: &str ) -> Result<Self, ManifestError> {
		Ok( toml::from_str( source )? )
	}

	/// Adds or replaces the package `name`.
	pub fn insert( &mut self, name: impl Into<String>, manifest: PackageManifest ) -> Option<PackageManifest> {
		self.0.insert( name.into(), manifest )
	}

	/// Looks up the package `name`.
	pub fn get( &self, name: &str ) -> Option<&PackageManifest> { self.0.get( name ) }

	/// Names of all configured packages in declaration order.
	pub fn names( &self ) -> impl Iterator<Item = &str> { self.0.keys().map( String::as_str ) }

	/// Number of configured packages.
	pub fn len( &self ) -> usize { self.0.len() }

	/// Whether no package is configured.
	pub fn is_empty( &self ) -> bool { self.0.is_empty() }

}

impl<N: Into<String>> FromIterator<( N, PackageManifest )> for Packages {
	fn from_iter<T: IntoIterator<Item = ( N, PackageManifest )>>( iter: T ) -> Self {
		Self( iter.into_iter().map(|( name, manifest )| ( name.into(), manifest )).collect() )
	}
}

/// The built-in plugin loading every asset listed by a package.
///
/// Each listed asset is tracked as one sub-task on the package's observer and
/// resolves when that asset's own observer completes. An unknown package, or
/// an entry naming a plugin the loader doesn't know, is reported as a
/// [`TaskError`]; the package still completes.
#[derive( Debug, Clone, Copy, Default )]
pub struct PackagesPlugin ;

impl<Ctx: 'static> Plugin<Ctx> for PackagesPlugin {
	fn load( &self, loader: &Loader<Ctx>, name: &str, observer: &Observer, done: Resolver ) {

		let Some( manifest ) = loader.packages().get( name ) else {
			return done.fail( TaskError::UnknownPackage( name.to_string() ));
		};

		log::debug!( "Package '{}' requests [{}]", name, manifest.assets()
			.map(|( plugin, id )| format!( "{}:{}", plugin, id ))
			.join( ", " ));

		manifest.assets().for_each(|( plugin, id )| observer.track(| asset_done | {
			match loader.observe( plugin, id, None ) {
				Ok( asset ) => asset.notify( move || asset_done.done() ),
				Err( err ) => asset_done.fail( err ),
			}
		}));

		done.done();

	}
}
