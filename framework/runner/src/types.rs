/// Recommended error type for your evaluation `main` function and any shared code that builds
/// scenarios. You can use `?` to propagate errors into it.
pub type HydrationBenchResult<T> = anyhow::Result<T>;
