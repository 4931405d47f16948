mod compatibility;
mod launch;
mod runtime;
