mod cms;
mod tracking;
