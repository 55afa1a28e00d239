use load_once::Observer ;
use crate::local_runtime::{ run_local, settle };
use crate::held_resolvers::HeldResolvers ;
use crate::recorder::Recorder ;

#[test]
fn observer_track_after_completion() { run_local( async {

	let observer = Observer::new();
	observer.track(| done | done.done() );
	observer.completed().await ;
	assert_eq!( observer.pending(), 0 );

	let held = HeldResolvers::new();
	{
		let held = held.clone();
		let expected = observer.clone();
		observer.track( move | done | {
			assert_eq!( done.observer().label(), expected.label() );
			assert_eq!( done.observer().pending(), 1 );
			held.hold( "late", done );
		});
	}

	assert_eq!( observer.pending(), 1 );
	assert!( observer.is_complete(), "completion is never withdrawn" );

	let fired = Recorder::new();
	{ let fired = fired.clone(); observer.notify( move || fired.push( "waiter" )); }
	assert_eq!( fired.len(), 0, "waiter must not run synchronously" );

	// The observer counts as complete, so the waiter doesn't wait for the late task.
	settle().await ;
	assert_eq!( fired.snapshot(), [ "waiter" ]);

	held.resolve( "late", Ok(()) );
	settle().await ;
	assert_eq!( observer.pending(), 0 );
	assert!( observer.is_complete() );
	assert_eq!( fired.snapshot(), [ "waiter" ], "waiter fires exactly once" );

})}
