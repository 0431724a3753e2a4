mod executor_test;
mod introspect_test;
