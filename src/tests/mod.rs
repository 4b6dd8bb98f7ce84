mod adhash;
mod basic;
mod canonical;
mod iter;
mod persistence;
mod properties;
mod stress;
mod sync;
mod tiny;
mod transient;
