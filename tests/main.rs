mod common;
mod examples;
mod fail;
mod inclusion;
mod normalize;
mod solution;
