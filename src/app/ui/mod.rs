mod fps;
mod panels;
