use load_once::{ Loader, LoaderConfig, PackageManifest };
use crate::local_runtime::{ run_local, settle };
use crate::recording_plugins::with_held_plugins ;
use crate::recorder::Recorder ;

#[test]
fn package_no_package_deps() { run_local( async {

	let ( config, requests ) = with_held_plugins(
		LoaderConfig::default()
			.with_package( "one", PackageManifest::new().with( "foo", [ "a", "b" ]).with( "bar", [ "c", "d" ])),
		&[ "foo", "bar" ],
	);
	let loader = Loader::new( config );

	let fired = Recorder::new();
	{ let fired = fired.clone(); loader.load( "packages", "one", move || fired.push( "one" )).expect( "packages is registered" ); }

	assert_eq!( requests.of( "foo" ), [ "a", "b" ], "loaded objects in order" );
	assert_eq!( requests.of( "bar" ), [ "c", "d" ], "loaded objects in order" );

	settle().await ;
	assert_eq!( fired.len(), 0 );

	requests.held.resolve_all();
	settle().await ;
	assert_eq!( fired.snapshot(), [ "one" ]);

})}
