mod de;
