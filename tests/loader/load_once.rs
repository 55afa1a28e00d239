use std::cell::Cell ;
use std::rc::Rc ;
use std::time::Duration ;
use load_once::{ Loader, LoaderConfig };
use crate::local_runtime::run_local ;

#[test]
fn loader_never_reloads_a_completed_asset() { run_local( async {

	let calls = Rc::new( Cell::new( 0 ));
	let plugin_calls = Rc::clone( &calls );
	let loader = Loader::new( LoaderConfig::default()
		.with_plugin_fn( "foo", move | _loader, _name, _observer, done | {
			plugin_calls.set( plugin_calls.get() + 1 );
			tokio::task::spawn_local( async move { done.done() });
		}));

	loader.load_future( "foo", "nfoo" ).expect( "foo is registered" ).await ;
	assert_eq!( calls.get(), 1 );

	// A later request for the same asset completes without running the plugin again.
	loader.load_future( "foo", "nfoo" ).expect( "foo is registered" ).await ;
	assert_eq!( calls.get(), 1 );

	loader.load_future( "foo", "zfoo" ).expect( "foo is registered" ).await ;
	assert_eq!( calls.get(), 2 );

})}

#[test]
fn loader_dropped_before_completion_never_resolves() { run_local( async {

	let loaded = {
		let loader = Loader::new( LoaderConfig::default()
			.with_plugin_fn( "js", | _loader, _name, _observer, done | drop( done )));
		loader.load_future( "js", "x" ).expect( "js is registered" )
	};

	let outcome = tokio::time::timeout( Duration::from_millis( 50 ), loaded ).await ;
	assert!( outcome.is_err(), "load resolved although 'js:x' never completed" );

})}
