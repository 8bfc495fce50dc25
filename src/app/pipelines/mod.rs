pub mod sankey_pipeline;
