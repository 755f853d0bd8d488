/// Name of the enclosing function, without its module path.
///
/// Closures are skipped, so the macro yields the function that contains them.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        let name = name.strip_suffix("::__here").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// Time a block inside a scoped region and yield the block's value.
///
/// ```rust,ignore
/// let mut registry = ProfileRegistry::new();
/// let sum = profile!(registry, "sum", { (0..10).sum::<u32>() });
/// profile!(registry, { work() }); // named after the enclosing function
/// ```
///
/// The region is held by a [`RegionGuard`](crate::RegionGuard), so it ends on
/// every way out of the block: falling off the end, `?`, `return`, `break`
/// or a panic. Inside the block `$registry` is rebound to the guarded
/// registry, so nested `profile!` calls and direct `begin`/`end` still work.
/// If `begin` fails the block still runs and nothing is recorded.
///
/// Without the `enabled` feature the block is evaluated and nothing else.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! profile {
    ($registry:ident, $name:expr, $body:block) => {{
        let __profile_name: &str = $name;
        let __profile_started = match $registry.begin(__profile_name) {
            Ok(()) => true,
            Err(err) => {
                $crate::__tracing::warn!(
                    event = "Begin",
                    phase = "Macro",
                    name = __profile_name,
                    error = %err
                );
                false
            }
        };
        if __profile_started {
            let mut __profile_guard = $registry.adopt_region(__profile_name);
            #[allow(unused_variables)]
            let $registry: &mut $crate::ProfileRegistry = &mut *__profile_guard;
            $body
        } else {
            $body
        }
    }};
    ($registry:ident, $body:block) => {
        $crate::profile!($registry, $crate::function_name!(), $body)
    };
}

#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! profile {
    ($registry:ident, $name:expr, $body:block) => {{
        let _ = &$registry;
        $body
    }};
    ($registry:ident, $body:block) => {{
        let _ = &$registry;
        $body
    }};
}
