mod lineage;
mod logging;
mod validation;
