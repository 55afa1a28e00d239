#[allow( dead_code )]
mod local_runtime {

	use std::future::Future ;
	use std::time::Duration ;

	/// Runs `future` on a current-thread runtime inside a `LocalSet`, failing
	/// the test if it hasn't finished within five seconds.
	pub fn run_local<F: Future>( future: F ) -> F::Output {
		let _ = env_logger::builder().is_test( true ).try_init();
		let runtime = tokio::runtime::Builder::new_current_thread()
			.enable_time()
			.build()
			.expect( "Failed to build runtime" );
		tokio::task::LocalSet::new().block_on( &runtime, async move {
			tokio::time::timeout( Duration::from_secs( 5 ), future ).await
				.expect( "Timed out waiting for completion" )
		})
	}

	/// Yields enough times for every deferred task queued so far to run.
	pub async fn settle() {
		for _ in 0..32 { tokio::task::yield_now().await }
	}

}
