use load_once::{ Loader, LoaderConfig, Packages, AssetState };
use crate::local_runtime::{ run_local, settle };
use crate::recording_plugins::with_held_plugins ;
use crate::recorder::Recorder ;

const PACKAGES: &str = r#"
[one]
js = ["one", "one_dep"]

[two]
js = ["two"]
template = ["magic"]
style = ["magic"]

[three]
js = ["three"]
"#;

#[test]
fn package_fans_out_to_every_plugin() { run_local( async {

	let packages = Packages::from_toml_str( PACKAGES ).expect( "valid manifest" );
	let ( config, requests ) = with_held_plugins(
		LoaderConfig::default().with_packages( packages ),
		&[ "js", "template", "style" ],
	);
	let loader = Loader::new( config );

	let fired = Recorder::new();
	{ let fired = fired.clone(); loader.load( "packages", "two", move || fired.push( "two" )).expect( "packages is registered" ); }

	assert_eq!( requests.loaded.snapshot(), [
		( "js".to_string(), "two".to_string() ),
		( "template".to_string(), "magic".to_string() ),
		( "style".to_string(), "magic".to_string() ),
	]);

	// Resolving all but the last asset isn't enough.
	requests.held.resolve( "two", Ok(()) );
	requests.held.resolve( "magic", Ok(()) );
	settle().await ;
	assert_eq!( fired.len(), 0 );
	assert_eq!( loader.state( "packages", "two" ), Some( AssetState::Pending ));

	requests.held.resolve( "magic", Ok(()) );
	settle().await ;
	assert_eq!( fired.snapshot(), [ "two" ]);
	assert_eq!( loader.state( "packages", "two" ), Some( AssetState::Complete ));

})}

#[test]
fn package_bootstrap_sequence() { run_local( async {

	let packages = Packages::from_toml_str( PACKAGES ).expect( "valid manifest" );
	let loader = Loader::new( LoaderConfig::default()
		.with_packages( packages )
		.with_plugin_fn( "js", | _loader, _name, _observer, done | { tokio::task::spawn_local( async move { done.done() }); })
		.with_plugin_fn( "template", | _loader, _name, _observer, done | done.done() )
		.with_plugin_fn( "style", | _loader, _name, _observer, done | done.done() ));

	let order = Recorder::new();
	let ( sender, receiver ) = tokio::sync::oneshot::channel();
	{
		let order = order.clone();
		let chain = loader.clone();
		loader.load( "packages", "one", move || {
			order.push( "one" );
			let loader = chain.clone();
			chain.load( "packages", "two", move || {
				order.push( "two" );
				let order = order.clone();
				loader.load( "packages", "three", move || {
					order.push( "three" );
					let _ = sender.send(());
				}).expect( "packages is registered" );
			}).expect( "packages is registered" );
		}).expect( "packages is registered" );
	}

	receiver.await.expect( "bootstrap never finished" );
	assert_eq!( order.snapshot(), [ "one", "two", "three" ]);

})}
