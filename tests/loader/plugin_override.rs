use load_once::{ Loader, LoaderConfig, PackageManifest, PACKAGES_PLUGIN };
use crate::local_runtime::run_local ;
use crate::recorder::Recorder ;

#[test]
fn loader_default_plugins_are_registered() {
	let loader = Loader::new( LoaderConfig::default() );
	assert!( loader.has_plugin( PACKAGES_PLUGIN ));
}

#[test]
fn loader_config_overrides_default_plugin() { run_local( async {

	let calls = Recorder::new();
	let plugin_calls = calls.clone();
	let loader = Loader::new( LoaderConfig::default()
		.with_plugin_fn( "js", | _loader, _name, _observer, done | done.done() )
		.with_plugin_fn( PACKAGES_PLUGIN, move | _loader, name, _observer, done | {
			plugin_calls.push( name.to_string() );
			done.done();
		})
		.with_package( "one", PackageManifest::new().with( "js", [ "a" ])));

	loader.load_future( PACKAGES_PLUGIN, "one" ).expect( "packages is registered" ).await ;

	assert_eq!( calls.snapshot(), [ "one" ]);
	assert_eq!( loader.state( "js", "a" ), None, "the default package plugin must not run" );

})}

#[test]
fn loader_later_registration_wins() { run_local( async {

	let calls = Recorder::new();
	let ( first, second ) = ( calls.clone(), calls.clone() );
	let loader = Loader::new( LoaderConfig::default()
		.with_plugin_fn( "js", move | _loader, _name, _observer, done | { first.push( "first" ); done.done() })
		.with_plugin_fn( "js", move | _loader, _name, _observer, done | { second.push( "second" ); done.done() }));

	loader.load_future( "js", "a" ).expect( "js is registered" ).await ;
	assert_eq!( calls.snapshot(), [ "second" ]);

})}
