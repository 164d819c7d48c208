mod cities;
mod helpers;
mod historical_chart;
mod predict;
